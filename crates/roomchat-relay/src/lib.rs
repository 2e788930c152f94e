//! In-process relay for Roomchat.
//!
//! Serves the terminal client's loopback mode and backs the simulation
//! harness. No network, no persistence beyond a bounded per-room history.
//!
//! - [`LocalRelay`]: room membership, history and fan-out in memory
//! - [`MemoryTransport`]: a [`roomchat_client::Transport`] bound to a
//!   [`LocalRelay`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod local_relay;
pub mod memory_transport;

pub use local_relay::{ConnectionId, DEFAULT_HISTORY_LIMIT, LocalRelay};
pub use memory_transport::MemoryTransport;

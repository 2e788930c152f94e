//! Deterministic simulation harness for Roomchat.
//!
//! Seeded [`Environment`], scripted driver and multi-client clusters over
//! the in-process relay, so sessions, the app runtime and whole scenarios
//! run reproducibly without a network.
//!
//! - [`LocalRelay`], [`MemoryTransport`]: re-exported from `roomchat-relay`
//! - [`SimEnv`]: seeded nonce source
//! - [`SimDriver`]: scripted [`roomchat_app::Driver`]
//! - [`TestCluster`]: several sessions over one relay
//!
//! # Invariant Testing
//!
//! The `invariants` module checks properties of the app state that must hold
//! after every event. Use [`InvariantRegistry::standard()`] with
//! [`SimDriver::with_invariants`] to check them on every render.
//!
//! [`Environment`]: roomchat_client::Environment

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cluster;
pub mod invariants;
pub mod sim_driver;
pub mod sim_env;

pub use cluster::{SimSession, TestCluster};
pub use invariants::{
    ExclusiveAudio, Invariant, InvariantRegistry, InvariantResult, PreviewTargetsAttachment,
    ScrollInBounds, Violation,
};
pub use roomchat_relay::{ConnectionId, LocalRelay, MemoryTransport};
pub use sim_driver::{SimDriver, SimDriverError, SimHandle};
pub use sim_env::SimEnv;

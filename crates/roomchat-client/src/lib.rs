//! Client
//!
//! Chat session state and the realtime transport adapter for Roomchat. A
//! [`ChatSession`] joins one room at a time, holds that room's key, and turns
//! inbound channel events into a decrypted message log.
//!
//! # Architecture
//!
//! The session owns an injected [`Transport`] handle. Transport callbacks
//! registered with [`Transport::on`] only enqueue payloads; the caller drains
//! them with [`ChatSession::next_inbound`] and applies them with
//! [`ChatSession::handle_inbound`]. Every state change goes through one of
//! the explicit transitions (`join`, `receive_message`, `receive_history`,
//! `receive_roster`, `send`) and is published to subscribers as a
//! [`SessionUpdate`].
//!
//! Key derivation and every encrypt/decrypt run on blocking workers and are
//! awaited, so the caller's event loop never stalls on crypto.
//!
//! # Components
//!
//! - [`ChatSession`]: Session state machine over a transport
//! - [`Transport`]: Realtime publish/subscribe channel abstraction
//! - [`HandlerTable`]: Shared event-handler registry for transport
//!   implementations
//! - [`Environment`]: Source of randomness for nonces
//!
//! # Transport (optional)
//!
//! With the `quic` feature enabled, this crate also provides
//! [`transport::quic::QuicTransport`], a QUIC binding to a relay.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod env;
mod error;
mod event;
mod session;
pub mod transport;

pub use env::{Environment, SystemEnv};
pub use error::{SessionError, TransportError};
pub use event::{DisplayMessage, SessionPhase, SessionUpdate};
pub use roomchat_crypto::PLACEHOLDER_TEXT;
pub use session::{ChatSession, SessionConfig};
pub use transport::{EventHandler, HandlerTable, Transport};

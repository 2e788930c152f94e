//! Client error types.

use roomchat_proto::ProtocolError;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),

    /// Event could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Operation requires a connection.
    #[error("not connected")]
    NotConnected,

    /// The connection task has shut down.
    #[error("connection closed")]
    Closed,
}

/// Session errors.
///
/// Only failures of the transport or of the runtime surface here. Missing
/// preconditions are silent no-ops and decryption failures become
/// placeholders; neither is an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Emitting to the transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A crypto worker task did not complete.
    #[error("crypto worker failed: {reason}")]
    Worker {
        /// Why the worker did not complete.
        reason: String,
    },
}

impl SessionError {
    pub(crate) fn worker(err: &tokio::task::JoinError) -> Self {
        Self::Worker { reason: err.to_string() }
    }
}

//! Protocol errors.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors from encoding or decoding channel events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// Event name is not part of the contract.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Encoded envelope exceeds the size limit.
    #[error("envelope too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

//! Error types for room cipher operations

use thiserror::Error;

/// Errors from room key and message cipher operations.
///
/// None of these are fatal. Chat views substitute
/// [`PLACEHOLDER_TEXT`](crate::PLACEHOLDER_TEXT) for any message that fails
/// to open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Authentication tag did not verify (wrong key, tampering, or a nonce
    /// that does not belong to the ciphertext)
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for decryption failure
        reason: String,
    },

    /// Nonce has the wrong number of bytes
    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected nonce length
        expected: usize,
        /// Actual nonce length
        actual: usize,
    },

    /// Decrypted bytes are not valid UTF-8 text
    #[error("plaintext is not valid UTF-8")]
    InvalidUtf8,
}

impl CryptoError {
    /// Returns true if the payload itself is malformed, as opposed to being
    /// well-formed but sealed under a different key.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::InvalidNonceLength { .. } | Self::InvalidUtf8)
    }
}

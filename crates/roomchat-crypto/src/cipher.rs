//! Message encryption using AES-256-GCM
//!
//! All functions are pure - nonce bytes must be provided by the caller.
//! This keeps encryption deterministic under a seeded test RNG.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};

use crate::{CryptoError, RoomKey};

/// Size of the AES-GCM nonce (96 bits)
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Text shown in place of a message that cannot be decrypted.
pub const PLACEHOLDER_TEXT: &str = "[Encrypted]";

/// A sealed text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedText {
    /// The 12-byte AES-GCM nonce
    pub nonce: [u8; NONCE_SIZE],
    /// The ciphertext including the 16-byte GCM tag
    pub ciphertext: Vec<u8>,
}

impl SealedText {
    /// Build from wire parts, validating the nonce length.
    pub fn from_parts(nonce: &[u8], ciphertext: Vec<u8>) -> Result<Self, CryptoError> {
        let nonce: [u8; NONCE_SIZE] = nonce.try_into().map_err(|_| {
            CryptoError::InvalidNonceLength { expected: NONCE_SIZE, actual: nonce.len() }
        })?;

        Ok(Self { nonce, ciphertext })
    }

    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }
}

/// Encrypt UTF-8 text under a room key.
///
/// # Security
///
/// - `nonce` MUST be fresh for every call under the same key. Reusing a
///   nonce with AES-GCM leaks the XOR of plaintexts and allows forgeries.
/// - Caller MUST provide cryptographically secure random bytes in production
pub fn encrypt_text(plaintext: &str, key: &RoomKey, nonce: [u8; NONCE_SIZE]) -> SealedText {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let Ok(ciphertext) = cipher.encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes()) else {
        unreachable!("AES-256-GCM encryption cannot fail for messages under 64 GiB");
    };

    SealedText { nonce, ciphertext }
}

/// Decrypt a sealed text message.
///
/// # Errors
///
/// - `DecryptionFailed`: authentication tag did not verify, or the
///   ciphertext is shorter than the tag
/// - `InvalidUtf8`: the tag verified but the plaintext is not text
pub fn decrypt_text(sealed: &SealedText, key: &RoomKey) -> Result<String, CryptoError> {
    if sealed.ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::DecryptionFailed {
            reason: format!(
                "ciphertext too short: {} bytes, need at least {TAG_SIZE}",
                sealed.ciphertext.len()
            ),
        });
    }

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed { reason: "authentication failed".to_string() })?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
}

//! Room key derivation using PBKDF2-HMAC-SHA256
//!
//! # Security Properties
//!
//! - Determinism: the same room name always produces the same key
//! - Isolation: different room names produce unrelated keys
//! - Fixed salt: the key depends on the room name only. Anyone who knows the
//!   room name can derive the key; the room name is the shared secret.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Size of a room key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// PBKDF2 iteration count
pub const KEY_DERIVATION_ITERATIONS: u32 = 100_000;

/// Salt shared by every room.
///
/// A constant salt makes derivation a pure function of the room name, which
/// is what lets participants meet in a room without any key exchange. It also
/// means precomputed dictionaries of room names apply to every deployment.
pub const KEY_DERIVATION_SALT: &[u8] = b"roomchat-room-key-salt-v1";

/// Label mixed into key fingerprints (domain separation)
const FINGERPRINT_LABEL: &[u8] = b"roomchat fingerprint v1";

/// Number of digest bytes shown in a fingerprint
const FINGERPRINT_BYTES: usize = 8;

/// Symmetric key for one room.
///
/// Scoped to the message cipher: there is no accessor that exports the raw
/// bytes outside this crate. Key material is zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct RoomKey {
    key: [u8; KEY_SIZE],
}

impl RoomKey {
    /// Derive the key for a room.
    ///
    /// CPU-bound (100k PBKDF2 iterations). Async callers should run this on a
    /// blocking worker.
    ///
    /// Empty room names are accepted here; rejecting them is the caller's
    /// job.
    pub fn derive(room: &str) -> Self {
        let mut key = [0u8; KEY_SIZE];
        pbkdf2::pbkdf2_hmac::<Sha256>(
            room.as_bytes(),
            KEY_DERIVATION_SALT,
            KEY_DERIVATION_ITERATIONS,
            &mut key,
        );

        Self { key }
    }

    /// Import raw key material.
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Short, non-secret identifier of this key.
    ///
    /// Two participants holding the same key see the same fingerprint. Safe
    /// to log and display.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(FINGERPRINT_LABEL);
        hasher.update(self.key);
        let digest = hasher.finalize();

        digest.iter().take(FINGERPRINT_BYTES).map(|byte| format!("{byte:02x}")).collect()
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomKey").field("fingerprint", &self.fingerprint()).finish()
    }
}

impl Drop for RoomKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

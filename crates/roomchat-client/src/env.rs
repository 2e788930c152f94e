//! Environment abstraction for deterministic testing.
//!
//! Decouples session logic from system randomness so nonces can come from a
//! seeded RNG in tests and from the OS in production.

use roomchat_crypto::NONCE_SIZE;

/// Abstract environment providing randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - Successive calls never repeat output for the lifetime of a room key;
///   nonce freshness depends on it
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a fresh AES-GCM nonce.
    fn random_nonce(&self) -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        self.random_bytes(&mut nonce);
        nonce
    }
}

/// Production environment using the OS cryptographic RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails. A client without working randomness cannot
/// produce safe nonces, and continuing would risk nonce reuse.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - nonces cannot be generated");
    }
}

//! Roomchat Cryptographic Primitives
//!
//! Cryptographic building blocks for Roomchat. Key derivation is
//! deterministic, and the cipher is a pure function of its inputs: callers
//! provide the nonce bytes so encryption stays testable with a seeded RNG.
//!
//! # Key Lifecycle
//!
//! Every participant who knows a room's name derives the same room key. The
//! key lives in memory for as long as the session stays in that room and is
//! replaced when another room is joined.
//!
//! ```text
//! Room name
//!        │
//!        ▼
//! PBKDF2-HMAC-SHA256 (fixed salt, 100k iterations) → Room Key
//!        │
//!        ▼
//! AES-256-GCM (fresh 96-bit nonce per message) → Ciphertext + Tag
//! ```
//!
//! # Security
//!
//! Confidentiality and Authenticity:
//! - AES-256-GCM AEAD provides tamper-proof encryption
//! - A failed authentication tag rejects the message (wrong key, corruption,
//!   or a nonce that does not belong to the ciphertext)
//! - Nonces MUST NOT repeat under one key; callers draw them from a CSPRNG
//!
//! Access model:
//! - The salt is a fixed constant, so the key is a function of the room name
//!   alone. Knowing the room name is the only thing needed to read the room.
//!   This is the access model of the system and is intentionally left as-is.
//!
//! Not provided:
//! - Forward secrecy, key rotation, sender authentication

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod error;
mod room_key;

pub use cipher::{NONCE_SIZE, PLACEHOLDER_TEXT, SealedText, TAG_SIZE, decrypt_text, encrypt_text};
pub use error::CryptoError;
pub use room_key::{KEY_DERIVATION_ITERATIONS, KEY_DERIVATION_SALT, KEY_SIZE, RoomKey};

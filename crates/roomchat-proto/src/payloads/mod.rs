//! JSON payload types carried inside envelopes.
//!
//! Optional fields are omitted from the JSON when absent, and unknown fields
//! are ignored on decode so newer relays can add metadata without breaking
//! older clients.

pub mod chat;
pub mod room;

pub use chat::{ChatMessage, EncryptedText, FileRef, WireText};
pub use room::{JoinRoom, RosterEntry};

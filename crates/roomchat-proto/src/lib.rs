//! Roomchat wire contract
//!
//! Event names and payload shapes exchanged with the external realtime relay.
//! Every event travels as a JSON [`Envelope`] carrying the event name and its
//! payload. Encrypted text is carried as plain arrays of byte values so the
//! payloads stay JSON-serializable without any binary framing.
//!
//! # Events
//!
//! | Direction | Event         | Payload                              |
//! |-----------|---------------|--------------------------------------|
//! | out       | `joinRoom`    | [`JoinRoom`]                         |
//! | out / in  | `message`     | [`ChatMessage`]                      |
//! | in        | `usersInRoom` | array of [`RosterEntry`]             |
//! | in        | `roomHistory` | array of [`ChatMessage`]             |

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod envelope;
pub mod errors;
pub mod event;
pub mod payloads;

pub use envelope::{Envelope, Payload};
pub use errors::{ProtocolError, Result};
pub use event::EventName;
pub use payloads::{ChatMessage, EncryptedText, FileRef, JoinRoom, RosterEntry, WireText};

//! Session phases, log entries and update notifications.

use roomchat_crypto::PLACEHOLDER_TEXT;
use roomchat_proto::{FileRef, RosterEntry};

/// Lifecycle phase of a session.
///
/// A session starts `Unjoined` and never returns to it. Joining another room
/// stays `Joined` with the new room and key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No room joined yet.
    #[default]
    Unjoined,
    /// Joined a room; the room key is held.
    Joined {
        /// Our display name.
        username: String,
        /// Room identifier.
        room: String,
    },
}

/// A message in the session log, after decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Sender display name.
    pub from: String,
    /// Decrypted text, or [`PLACEHOLDER_TEXT`] if it could not be opened.
    /// `None` for attachment-only messages.
    pub text: Option<String>,
    /// File attachment reference.
    pub file: Option<FileRef>,
}

impl DisplayMessage {
    /// True if the text body failed to decrypt.
    pub fn is_undecryptable(&self) -> bool {
        self.text.as_deref() == Some(PLACEHOLDER_TEXT)
    }
}

/// Notification published after every state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// A room was joined and its key derived.
    Joined {
        /// Our display name.
        username: String,
        /// Room identifier.
        room: String,
        /// Non-secret fingerprint of the room key.
        fingerprint: String,
    },
    /// The roster was replaced.
    RosterChanged(Vec<RosterEntry>),
    /// A message was appended to the log.
    MessageAppended(DisplayMessage),
    /// The log was replaced by a history snapshot.
    HistoryReplaced(Vec<DisplayMessage>),
}

//! Application input events.
//!
//! This module defines [`AppEvent`], the comprehensive set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (Keyboard, Resize) and system ticks.
//! - Session updates translated from the underlying client.

use roomchat_client::{DisplayMessage, SessionUpdate};
use roomchat_proto::RosterEntry;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Connection in progress.
    Connecting,

    /// Transport connected.
    Connected,

    /// Transport failed or closed.
    Disconnected {
        /// Why the connection ended.
        reason: String,
    },

    /// Joined a room.
    Joined {
        /// Our display name.
        username: String,
        /// Room identifier.
        room: String,
        /// Room key fingerprint.
        fingerprint: String,
    },

    /// Roster replaced.
    RosterChanged(Vec<RosterEntry>),

    /// Message appended to the log.
    MessageAppended(DisplayMessage),

    /// Log replaced by a history snapshot.
    HistoryReplaced(Vec<DisplayMessage>),

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}

impl From<SessionUpdate> for AppEvent {
    fn from(update: SessionUpdate) -> Self {
        match update {
            SessionUpdate::Joined { username, room, fingerprint } => {
                Self::Joined { username, room, fingerprint }
            },
            SessionUpdate::RosterChanged(roster) => Self::RosterChanged(roster),
            SessionUpdate::MessageAppended(message) => Self::MessageAppended(message),
            SessionUpdate::HistoryReplaced(messages) => Self::HistoryReplaced(messages),
        }
    }
}

//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use roomchat_proto::FileRef;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Connect the transport.
    Connect,

    /// Join a room.
    JoinRoom {
        /// Display name, trimmed and non-empty.
        username: String,
        /// Room identifier, trimmed and non-empty.
        room: String,
    },

    /// Send a message to the joined room.
    SendMessage {
        /// Message text (may be empty when a file is attached).
        text: String,
        /// Staged attachment.
        file: Option<FileRef>,
    },
}

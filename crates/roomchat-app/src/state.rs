//! Observable application state types.
//!
//! These structures are the view model: the subset of session state needed
//! for rendering, plus purely presentational state (form focus, composer,
//! scroll offset, open preview).

use roomchat_client::DisplayMessage;
use roomchat_proto::{FileRef, RosterEntry};

use crate::{AttachmentKind, TextInput};

/// Connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Transport connected.
    Connected,
}

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Username and room entry.
    Login,
    /// Joined room.
    Chat,
}

/// Focused login field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    /// Display name.
    Username,
    /// Room identifier.
    Room,
}

/// Login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    /// Display name input.
    pub username: TextInput,
    /// Room identifier input.
    pub room: TextInput,
    /// Focused field.
    pub focus: LoginField,
}

impl LoginForm {
    /// Form pre-filled with the given values, focused on the first empty
    /// field.
    pub fn new(username: &str, room: &str) -> Self {
        let focus = if username.is_empty() || !room.is_empty() {
            LoginField::Username
        } else {
            LoginField::Room
        };
        Self { username: TextInput::with_text(username), room: TextInput::with_text(room), focus }
    }

    /// The focused input.
    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Room => &mut self.room,
        }
    }

    /// Switch focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Room,
            LoginField::Room => LoginField::Username,
        };
    }

    /// Trimmed values if both are non-empty.
    pub fn submission(&self) -> Option<(String, String)> {
        let username = self.username.as_str().trim();
        let room = self.room.as_str().trim();
        if username.is_empty() || room.is_empty() {
            return None;
        }
        Some((username.to_string(), room.to_string()))
    }
}

/// Message composer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    /// Text being typed.
    pub input: TextInput,
    /// File staged for the next message.
    pub staged: Option<FileRef>,
}

/// State of the joined room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomView {
    /// Room identifier.
    pub room: String,
    /// Our display name.
    pub username: String,
    /// Room key fingerprint.
    pub fingerprint: String,
    /// Latest roster.
    pub roster: Vec<RosterEntry>,
    /// Message log.
    pub messages: Vec<DisplayMessage>,
}

impl RoomView {
    /// Empty view of a freshly joined room.
    pub fn new(username: String, room: String, fingerprint: String) -> Self {
        Self { room, username, fingerprint, roster: Vec::new(), messages: Vec::new() }
    }

    /// Attachment of message `index`, with its kind.
    pub fn attachment(&self, index: usize) -> Option<(&FileRef, AttachmentKind)> {
        let file = self.messages.get(index)?.file.as_ref()?;
        Some((file, AttachmentKind::of(file)))
    }
}

/// Open preview modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Message position in the log.
    pub index: usize,
    /// Previewed file.
    pub file: FileRef,
    /// Image or video.
    pub kind: AttachmentKind,
}

//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the application completely decoupled from I/O and the session.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Login form editing and submission.
//! - Mirrors the joined room (roster, message log, key fingerprint).
//! - Composer editing, slash commands and the staged attachment.
//! - Follow-tail scrolling, preview modal and audio players.

use roomchat_client::DisplayMessage;

use crate::{
    AppAction, AppEvent, AttachmentKind, AudioPlayers, Command, Composer, ConnectionState,
    KeyInput, LoginForm, Preview, RoomView, Screen, attachment,
};

/// Messages scrolled per page.
pub const PAGE_SIZE: usize = 10;

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state.
    state: ConnectionState,
    /// Relay description for the status bar.
    server_label: String,
    /// Shown screen.
    screen: Screen,
    /// Login form.
    login: LoginForm,
    /// Joined room. `None` before the first join.
    room: Option<RoomView>,
    /// Message composer.
    composer: Composer,
    /// Messages scrolled back from the newest. 0 follows the tail.
    scroll: usize,
    /// Open preview modal.
    preview: Option<Preview>,
    /// Audio players of the joined room.
    audio: AudioPlayers,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App showing an empty login form.
    pub fn new(server_label: String) -> Self {
        Self::with_login(server_label, "", "")
    }

    /// Create a new App with a pre-filled login form.
    pub fn with_login(server_label: String, username: &str, room: &str) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            server_label,
            screen: Screen::Login,
            login: LoginForm::new(username, room),
            room: None,
            composer: Composer::default(),
            scroll: 0,
            preview: None,
            audio: AudioPlayers::new(),
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => {
                if self.audio.tick() {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connecting => {
                self.state = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.state = ConnectionState::Connected;
                vec![AppAction::Render]
            },
            AppEvent::Disconnected { reason } => {
                self.state = ConnectionState::Disconnected;
                self.status_message = Some(format!("Disconnected: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::Joined { username, room, fingerprint } => {
                self.status_message = Some(format!("Joined {room}"));
                self.room = Some(RoomView::new(username, room, fingerprint));
                self.screen = Screen::Chat;
                self.composer = Composer::default();
                self.scroll = 0;
                self.preview = None;
                self.audio.clear();
                vec![AppAction::Render]
            },
            AppEvent::RosterChanged(roster) => {
                if let Some(room) = self.room.as_mut() {
                    room.roster = roster;
                }
                vec![AppAction::Render]
            },
            AppEvent::MessageAppended(message) => {
                self.append_message(message);
                vec![AppAction::Render]
            },
            AppEvent::HistoryReplaced(messages) => {
                self.replace_messages(messages);
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Initiate connection.
    pub fn connect(&mut self) -> Vec<AppAction> {
        self.state = ConnectionState::Connecting;
        vec![AppAction::Connect, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Esc {
            return if self.preview.take().is_some() {
                vec![AppAction::Render]
            } else {
                self.quit()
            };
        }

        // Modal swallows everything else.
        if self.preview.is_some() {
            return vec![];
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Tab | KeyInput::Up | KeyInput::Down => self.login.toggle_focus(),
            KeyInput::Enter => return self.submit_login(),
            other => edit(self.login.focused_mut(), other),
        }
        vec![AppAction::Render]
    }

    fn submit_login(&mut self) -> Vec<AppAction> {
        let Some((username, room)) = self.login.submission() else {
            self.status_message = Some("Enter a username and a room".to_string());
            return vec![AppAction::Render];
        };

        self.status_message = Some(format!("Joining {room}..."));
        vec![AppAction::JoinRoom { username, room }, AppAction::Render]
    }

    fn handle_chat_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Enter => return self.submit_composer(),
            KeyInput::Up => self.scroll_back(1),
            KeyInput::Down => self.scroll = self.scroll.saturating_sub(1),
            KeyInput::PageUp => self.scroll_back(PAGE_SIZE),
            KeyInput::PageDown => self.scroll = self.scroll.saturating_sub(PAGE_SIZE),
            KeyInput::End => {
                self.scroll = 0;
                self.composer.input.end();
            },
            KeyInput::Tab => return vec![],
            other => edit(&mut self.composer.input, other),
        }
        vec![AppAction::Render]
    }

    fn submit_composer(&mut self) -> Vec<AppAction> {
        let line = self.composer.input.take();

        if let Some(parsed) = Command::parse(&line) {
            return match parsed {
                Ok(command) => self.run_command(command),
                Err(e) => {
                    self.status_message = Some(e.to_string());
                    vec![AppAction::Render]
                },
            };
        }

        let text = line.trim().to_string();
        if text.is_empty() && self.composer.staged.is_none() {
            return vec![AppAction::Render];
        }

        let file = self.composer.staged.take();
        self.scroll = 0;
        vec![AppAction::SendMessage { text, file }, AppAction::Render]
    }

    fn run_command(&mut self, command: Command) -> Vec<AppAction> {
        match command {
            Command::Attach(path) => {
                let file = attachment::stage_file(&path);
                let kind = AttachmentKind::of(&file);
                self.status_message = Some(format!("Attached {} ({})", file.name, kind.label()));
                self.composer.staged = Some(file);
            },
            Command::Detach => {
                self.status_message = match self.composer.staged.take() {
                    Some(file) => Some(format!("Detached {}", file.name)),
                    None => Some("Nothing attached".to_string()),
                };
            },
            Command::Preview(n) => self.open_preview(n - 1),
            Command::Play(n) => {
                let index = n - 1;
                self.status_message = if self.is_audio(index) && self.audio.play(index) {
                    Some(format!("Playing #{n}"))
                } else {
                    Some(format!("No audio attachment at #{n}"))
                };
            },
            Command::Pause(n) => {
                let index = n - 1;
                self.status_message = if self.is_audio(index) && self.audio.pause(index) {
                    Some(format!("Paused #{n}"))
                } else {
                    Some(format!("No audio attachment at #{n}"))
                };
            },
            Command::Quit => return self.quit(),
        }
        vec![AppAction::Render]
    }

    fn open_preview(&mut self, index: usize) {
        let Some((file, kind)) = self.room.as_ref().and_then(|room| room.attachment(index)) else {
            self.status_message = Some(format!("No attachment at #{}", index + 1));
            return;
        };

        if kind.is_previewable() {
            self.preview = Some(Preview { index, file: file.clone(), kind });
        } else {
            self.status_message = Some(format!("#{} cannot be previewed", index + 1));
        }
    }

    fn is_audio(&self, index: usize) -> bool {
        self.room
            .as_ref()
            .and_then(|room| room.attachment(index))
            .is_some_and(|(_, kind)| kind == AttachmentKind::Audio)
    }

    fn scroll_back(&mut self, by: usize) {
        let max = self.messages().len().saturating_sub(1);
        self.scroll = (self.scroll + by).min(max);
    }

    fn append_message(&mut self, message: DisplayMessage) {
        let Some(room) = self.room.as_mut() else {
            return;
        };

        let index = room.messages.len();
        if message.file.as_ref().is_some_and(|f| AttachmentKind::of(f) == AttachmentKind::Audio) {
            self.audio.register(index);
        }
        room.messages.push(message);

        // Keep the viewport still while scrolled back.
        if self.scroll > 0 {
            self.scroll += 1;
        }
    }

    fn replace_messages(&mut self, messages: Vec<DisplayMessage>) {
        let Some(room) = self.room.as_mut() else {
            return;
        };

        self.audio.clear();
        for (index, message) in messages.iter().enumerate() {
            if message.file.as_ref().is_some_and(|f| AttachmentKind::of(f) == AttachmentKind::Audio)
            {
                self.audio.register(index);
            }
        }
        room.messages = messages;
        self.scroll = 0;
        self.preview = None;
    }

    /// Current connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.state
    }

    /// Relay description.
    pub fn server_label(&self) -> &str {
        &self.server_label
    }

    /// Shown screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Login form.
    pub fn login(&self) -> &LoginForm {
        &self.login
    }

    /// Joined room. `None` before the first join.
    pub fn room(&self) -> Option<&RoomView> {
        self.room.as_ref()
    }

    /// Messages of the joined room.
    pub fn messages(&self) -> &[DisplayMessage] {
        self.room.as_ref().map_or(&[], |room| room.messages.as_slice())
    }

    /// Message composer.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Messages scrolled back from the newest. 0 follows the tail.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Open preview modal.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Audio players.
    pub fn audio(&self) -> &AudioPlayers {
        &self.audio
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

/// Apply an editing key to a text input.
fn edit(input: &mut crate::TextInput, key: KeyInput) {
    match key {
        KeyInput::Char(c) => input.insert(c),
        KeyInput::Backspace => input.backspace(),
        KeyInput::Delete => input.delete(),
        KeyInput::Left => input.left(),
        KeyInput::Right => input.right(),
        KeyInput::Home => input.home(),
        KeyInput::End => input.end(),
        KeyInput::Enter
        | KeyInput::Tab
        | KeyInput::Esc
        | KeyInput::Up
        | KeyInput::Down
        | KeyInput::PageUp
        | KeyInput::PageDown => {},
    }
}

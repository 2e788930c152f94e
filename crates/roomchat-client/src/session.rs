//! Chat session state machine.
//!
//! The `ChatSession` owns the joined room, its key, the roster and the
//! decrypted message log. Inbound transport events are queued by handlers
//! and applied by the caller through [`ChatSession::handle_inbound`].

use std::sync::Arc;

use futures::future::join_all;
use roomchat_crypto::{PLACEHOLDER_TEXT, RoomKey, SealedText, decrypt_text, encrypt_text};
use roomchat_proto::{
    ChatMessage, EncryptedText, EventName, FileRef, JoinRoom, Payload, RosterEntry, WireText,
};
use tokio::sync::{broadcast, mpsc};

use crate::{
    env::Environment,
    error::SessionError,
    event::{DisplayMessage, SessionPhase, SessionUpdate},
    transport::Transport,
};

/// Events the session consumes from the transport.
const INBOUND_EVENTS: [EventName; 3] =
    [EventName::Message, EventName::UsersInRoom, EventName::RoomHistory];

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capacity of the update broadcast channel. Slow subscribers that fall
    /// further behind than this miss updates.
    pub update_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { update_capacity: 256 }
    }
}

/// Encrypted chat session over an injected transport.
pub struct ChatSession<T: Transport, E: Environment> {
    /// Realtime channel to the relay.
    transport: T,

    /// Source of nonces.
    env: E,

    /// Joined room, if any.
    phase: SessionPhase,

    /// Key of the joined room. Replaced by a single assignment on join;
    /// in-flight crypto keeps the snapshot it captured.
    key: Option<Arc<RoomKey>>,

    /// Latest roster snapshot.
    roster: Vec<RosterEntry>,

    /// Decrypted message log.
    log: Vec<DisplayMessage>,

    /// Update notifications.
    updates: broadcast::Sender<SessionUpdate>,

    /// Queue fed by transport handlers.
    inbound_tx: mpsc::UnboundedSender<Payload>,
    inbound_rx: mpsc::UnboundedReceiver<Payload>,
}

impl<T: Transport, E: Environment> ChatSession<T, E> {
    /// Create a session with the default configuration.
    ///
    /// Transport handlers are attached immediately.
    pub fn new(transport: T, env: E) -> Self {
        Self::with_config(transport, env, SessionConfig::default())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(transport: T, env: E, config: SessionConfig) -> Self {
        let (updates, _) = broadcast::channel(config.update_capacity.max(1));
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let mut session = Self {
            transport,
            env,
            phase: SessionPhase::Unjoined,
            key: None,
            roster: Vec::new(),
            log: Vec::new(),
            updates,
            inbound_tx,
            inbound_rx,
        };
        session.attach_transport_handlers();
        session
    }

    /// Connect the transport and (re)attach handlers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transport` if the transport fails to connect.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        self.transport.connect().await?;
        self.attach_transport_handlers();
        Ok(())
    }

    /// Detach handlers and close the transport.
    pub fn disconnect(&mut self) {
        for event in INBOUND_EVENTS {
            self.transport.off(event);
        }
        self.transport.disconnect();
    }

    /// Register handlers that forward inbound events into the session queue.
    pub fn attach_transport_handlers(&mut self) {
        for event in INBOUND_EVENTS {
            let tx = self.inbound_tx.clone();
            self.transport.on(
                event,
                Arc::new(move |payload| {
                    // Receiver lives as long as the session.
                    let _ = tx.send(payload);
                }),
            );
        }
    }

    /// Join a room.
    ///
    /// Trims both inputs. Derives the room key on a blocking worker, announces
    /// the join, then switches room and key in one step. Roster and log are
    /// cleared since they belonged to the previous room.
    ///
    /// Returns `Ok(false)` without emitting if either input is empty.
    ///
    /// # Errors
    ///
    /// - `SessionError::Worker` if key derivation did not complete
    /// - `SessionError::Transport` if the announcement could not be emitted;
    ///   the previous room and key are kept
    pub async fn join(&mut self, username: &str, room: &str) -> Result<bool, SessionError> {
        let username = username.trim();
        let room = room.trim();
        if username.is_empty() || room.is_empty() {
            tracing::debug!("join ignored: empty username or room");
            return Ok(false);
        }

        let room_name = room.to_owned();
        let key = tokio::task::spawn_blocking(move || RoomKey::derive(&room_name))
            .await
            .map_err(|e| SessionError::worker(&e))?;

        self.transport
            .emit(Payload::JoinRoom(JoinRoom {
                username: username.to_owned(),
                room: room.to_owned(),
            }))
            .await?;

        let fingerprint = key.fingerprint();
        self.key = Some(Arc::new(key));
        self.phase =
            SessionPhase::Joined { username: username.to_owned(), room: room.to_owned() };
        self.roster.clear();
        self.log.clear();

        tracing::info!(%room, %username, %fingerprint, "joined room");
        self.notify(SessionUpdate::Joined {
            username: username.to_owned(),
            room: room.to_owned(),
            fingerprint,
        });

        Ok(true)
    }

    /// Send a message to the joined room.
    ///
    /// Text is trimmed and encrypted under a fresh nonce; the file reference
    /// is sent as is. Nothing is appended locally since the relay echoes
    /// messages back to the sender.
    ///
    /// Returns `Ok(None)` without emitting if there is nothing to send or no
    /// room is joined.
    ///
    /// # Errors
    ///
    /// - `SessionError::Worker` if encryption did not complete
    /// - `SessionError::Transport` if the message could not be emitted
    pub async fn send(
        &mut self,
        text: &str,
        file: Option<FileRef>,
    ) -> Result<Option<ChatMessage>, SessionError> {
        let text = text.trim();
        if text.is_empty() && file.is_none() {
            return Ok(None);
        }

        let (SessionPhase::Joined { username, room }, Some(key)) = (&self.phase, &self.key) else {
            tracing::debug!("send ignored: no room joined");
            return Ok(None);
        };
        let from = username.clone();
        let room = room.clone();
        let key = Arc::clone(key);

        let sealed = if text.is_empty() {
            None
        } else {
            let nonce = self.env.random_nonce();
            let plaintext = text.to_owned();
            let sealed =
                tokio::task::spawn_blocking(move || encrypt_text(&plaintext, &key, nonce))
                    .await
                    .map_err(|e| SessionError::worker(&e))?;
            let body = EncryptedText { iv: sealed.nonce.to_vec(), data: sealed.ciphertext };
            Some(WireText::Sealed(body))
        };

        let message = ChatMessage { from, room, text: sealed, file };
        self.transport.emit(Payload::Message(message.clone())).await?;

        tracing::debug!(room = %message.room, has_file = message.file.is_some(), "sent message");
        Ok(Some(message))
    }

    /// Apply one inbound message.
    ///
    /// Decrypts with the key held at receipt time and appends to the log.
    /// Messages for a room other than the joined one are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Worker` if decryption did not complete.
    pub async fn receive_message(
        &mut self,
        message: ChatMessage,
    ) -> Result<Option<DisplayMessage>, SessionError> {
        if let Some(room) = self.room() {
            if !message.room.is_empty() && message.room != room {
                tracing::debug!(to = %message.room, %room, "ignoring message for another room");
                return Ok(None);
            }
        }

        let key = self.key.clone();
        let display = tokio::task::spawn_blocking(move || open_message(message, key.as_deref()))
            .await
            .map_err(|e| SessionError::worker(&e))?;

        self.log.push(display.clone());
        self.notify(SessionUpdate::MessageAppended(display.clone()));
        Ok(Some(display))
    }

    /// Replace the log with a history snapshot.
    ///
    /// Every entry is decrypted on its own worker; the log is replaced once
    /// all of them finish, in input order. Entries that fail to decrypt get
    /// the placeholder individually.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Worker` if any decryption did not complete; the
    /// log is left unchanged.
    pub async fn receive_history(
        &mut self,
        messages: Vec<ChatMessage>,
    ) -> Result<usize, SessionError> {
        let count = messages.len();
        let opened = open_batch(messages, self.key.clone()).await?;

        let undecryptable = opened.iter().filter(|m| m.is_undecryptable()).count();
        tracing::debug!(count, undecryptable, "history replaced");

        self.log = opened;
        self.notify(SessionUpdate::HistoryReplaced(self.log.clone()));
        Ok(count)
    }

    /// Replace the roster wholesale.
    pub fn receive_roster(&mut self, roster: Vec<RosterEntry>) {
        tracing::debug!(count = roster.len(), "roster changed");
        self.roster = roster;
        self.notify(SessionUpdate::RosterChanged(self.roster.clone()));
    }

    /// Apply an inbound transport event.
    ///
    /// Returns the update produced, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Worker` if decryption did not complete.
    pub async fn handle_inbound(
        &mut self,
        payload: Payload,
    ) -> Result<Option<SessionUpdate>, SessionError> {
        match payload {
            Payload::Message(message) => {
                Ok(self.receive_message(message).await?.map(SessionUpdate::MessageAppended))
            },
            Payload::UsersInRoom(roster) => {
                self.receive_roster(roster);
                Ok(Some(SessionUpdate::RosterChanged(self.roster.clone())))
            },
            Payload::RoomHistory(messages) => {
                self.receive_history(messages).await?;
                Ok(Some(SessionUpdate::HistoryReplaced(self.log.clone())))
            },
            Payload::JoinRoom(_) => {
                tracing::debug!("ignoring joinRoom echo");
                Ok(None)
            },
        }
    }

    /// Wait for the next inbound transport event.
    ///
    /// Cancel-safe. Pending forever if the transport never delivers.
    pub async fn next_inbound(&mut self) -> Option<Payload> {
        self.inbound_rx.recv().await
    }

    /// Take the next queued inbound event without waiting.
    pub fn try_next_inbound(&mut self) -> Option<Payload> {
        self.inbound_rx.try_recv().ok()
    }

    /// Apply every queued inbound event. Returns how many were applied.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Worker` if decryption did not complete.
    pub async fn drain_inbound(&mut self) -> Result<usize, SessionError> {
        let mut applied = 0;
        while let Some(payload) = self.try_next_inbound() {
            self.handle_inbound(payload).await?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Subscribe to session updates.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates.subscribe()
    }

    /// Current phase.
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Check if a room is joined.
    pub fn is_joined(&self) -> bool {
        matches!(self.phase, SessionPhase::Joined { .. })
    }

    /// Joined room.
    pub fn room(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Joined { room, .. } => Some(room),
            SessionPhase::Unjoined => None,
        }
    }

    /// Our display name in the joined room.
    pub fn username(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Joined { username, .. } => Some(username),
            SessionPhase::Unjoined => None,
        }
    }

    /// Latest roster snapshot.
    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    /// Decrypted message log.
    pub fn messages(&self) -> &[DisplayMessage] {
        &self.log
    }

    /// Fingerprint of the held room key.
    pub fn key_fingerprint(&self) -> Option<String> {
        self.key.as_ref().map(|key| key.fingerprint())
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn notify(&self, update: SessionUpdate) {
        // No subscribers is fine.
        let _ = self.updates.send(update);
    }
}

impl<T: Transport, E: Environment> std::fmt::Debug for ChatSession<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("phase", &self.phase)
            .field("key", &self.key)
            .field("roster", &self.roster.len())
            .field("log", &self.log.len())
            .finish_non_exhaustive()
    }
}

/// Decrypt every message of a batch, one worker each, preserving order.
async fn open_batch(
    messages: Vec<ChatMessage>,
    key: Option<Arc<RoomKey>>,
) -> Result<Vec<DisplayMessage>, SessionError> {
    let tasks = messages.into_iter().map(|message| {
        let key = key.clone();
        tokio::task::spawn_blocking(move || open_message(message, key.as_deref()))
    });

    join_all(tasks)
        .await
        .into_iter()
        .map(|result| result.map_err(|e| SessionError::worker(&e)))
        .collect()
}

fn open_message(message: ChatMessage, key: Option<&RoomKey>) -> DisplayMessage {
    let ChatMessage { from, text, file, .. } = message;
    DisplayMessage { from, text: text.map(|text| open_text(text, key)), file }
}

/// Decrypt wire text, substituting the placeholder on any failure.
fn open_text(text: WireText, key: Option<&RoomKey>) -> String {
    let Some(key) = key else {
        tracing::debug!("no room key, text left sealed");
        return PLACEHOLDER_TEXT.to_string();
    };
    let WireText::Sealed(text) = text else {
        tracing::debug!("malformed text body");
        return PLACEHOLDER_TEXT.to_string();
    };

    let opened = SealedText::from_parts(&text.iv, text.data)
        .and_then(|sealed| decrypt_text(&sealed, key));

    match opened {
        Ok(plaintext) => plaintext,
        Err(error) => {
            tracing::debug!(%error, "message could not be decrypted");
            PLACEHOLDER_TEXT.to_string()
        },
    }
}

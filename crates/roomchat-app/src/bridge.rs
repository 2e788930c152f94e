//! Session-to-Application translation layer.
//!
//! The [`Bridge`] wraps the [`ChatSession`] and adapts it to the
//! application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts [`crate::AppAction`]s into session calls.
//! - Applies inbound transport events to the session.
//! - Interprets session results and converts them back into
//!   [`crate::AppEvent`]s to update the UI.

use roomchat_client::{ChatSession, Environment, SessionError, Transport};
use roomchat_proto::Payload;

use crate::{AppAction, AppEvent};

/// Bridge between App and the chat session.
///
/// Generic over Transport and Environment to support both production and
/// simulation.
pub struct Bridge<T: Transport, E: Environment> {
    session: ChatSession<T, E>,
}

impl<T: Transport, E: Environment> Bridge<T, E> {
    /// Create a new Bridge over a session.
    pub fn new(session: ChatSession<T, E>) -> Self {
        Self { session }
    }

    /// Create a new Bridge over a fresh session on `transport`.
    pub fn with_transport(transport: T, env: E) -> Self {
        Self::new(ChatSession::new(transport, env))
    }

    /// Connect the transport.
    pub async fn connect(&mut self) -> Vec<AppEvent> {
        match self.session.connect().await {
            Ok(()) => vec![AppEvent::Connecting, AppEvent::Connected],
            Err(e) => {
                tracing::warn!(error = %e, "connect failed");
                vec![AppEvent::Connecting, AppEvent::Disconnected { reason: e.to_string() }]
            },
        }
    }

    /// Process an App action and return resulting App events.
    pub async fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::JoinRoom { username, room } => {
                match self.session.join(&username, &room).await {
                    Ok(true) => self.joined_event().into_iter().collect(),
                    Ok(false) => vec![],
                    Err(e) => vec![error_event(&e)],
                }
            },
            AppAction::SendMessage { text, file } => match self.session.send(&text, file).await {
                Ok(_) => vec![],
                Err(e) => vec![error_event(&e)],
            },
            AppAction::Connect => self.connect().await,
            AppAction::Render | AppAction::Quit => vec![],
        }
    }

    /// Apply an inbound transport event.
    pub async fn handle_inbound(&mut self, payload: Payload) -> Vec<AppEvent> {
        match self.session.handle_inbound(payload).await {
            Ok(update) => update.map(AppEvent::from).into_iter().collect(),
            Err(e) => vec![error_event(&e)],
        }
    }

    /// Wait for the next inbound transport event.
    pub async fn next_inbound(&mut self) -> Option<Payload> {
        self.session.next_inbound().await
    }

    /// Apply every queued inbound event.
    pub async fn drain_inbound(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Some(payload) = self.session.try_next_inbound() {
            events.extend(self.handle_inbound(payload).await);
        }
        events
    }

    /// Close the transport.
    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }

    /// The wrapped session.
    pub fn session(&self) -> &ChatSession<T, E> {
        &self.session
    }

    /// The wrapped session, mutably.
    pub fn session_mut(&mut self) -> &mut ChatSession<T, E> {
        &mut self.session
    }

    fn joined_event(&self) -> Option<AppEvent> {
        Some(AppEvent::Joined {
            username: self.session.username()?.to_string(),
            room: self.session.room()?.to_string(),
            fingerprint: self.session.key_fingerprint()?,
        })
    }
}

fn error_event(error: &SessionError) -> AppEvent {
    tracing::warn!(%error, "session operation failed");
    AppEvent::Error { message: error.to_string() }
}

//! Realtime channel transport.
//!
//! A [`Transport`] is a session-scoped handle to the external relay with an
//! explicit connect/disconnect lifecycle. It moves whole events: [`emit`]
//! publishes one outbound [`Payload`], and inbound events are dispatched to
//! the handler registered for their [`EventName`] with [`on`].
//!
//! Handlers run on whatever task the implementation receives on. They should
//! do nothing but hand the payload off (the session pushes it into a queue).
//!
//! [`emit`]: Transport::emit
//! [`on`]: Transport::on

#[cfg(feature = "quic")]
pub mod quic;

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use roomchat_proto::{EventName, Payload};

use crate::TransportError;

/// Callback invoked for each inbound event of one kind.
pub type EventHandler = Arc<dyn Fn(Payload) + Send + Sync>;

/// Publish/subscribe channel to the relay.
///
/// No acknowledgement, retry, or ordering logic lives here; implementations
/// inherit whatever guarantees the underlying channel gives.
pub trait Transport: Send {
    /// Open the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be reached.
    fn connect(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Close the connection. Registered handlers are kept.
    fn disconnect(&mut self);

    /// Check if connected.
    fn is_connected(&self) -> bool;

    /// Publish one event. The event name is taken from the payload variant.
    ///
    /// # Errors
    ///
    /// Returns an error if not connected or the event cannot be sent.
    fn emit(&mut self, payload: Payload) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Register the handler for an event, replacing any previous one.
    fn on(&mut self, event: EventName, handler: EventHandler);

    /// Remove the handler for an event.
    fn off(&mut self, event: EventName);
}

/// Thread-safe handler registry shared between a transport and its receive
/// task.
///
/// Cloning shares the same table.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: Arc<Mutex<HashMap<EventName, EventHandler>>>,
}

impl HandlerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the handler for `event`.
    pub fn set(&self, event: EventName, handler: EventHandler) {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner).insert(event, handler);
    }

    /// Remove the handler for `event`.
    pub fn remove(&self, event: EventName) {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner).remove(&event);
    }

    /// Check if a handler is registered for `event`.
    pub fn contains(&self, event: EventName) -> bool {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner).contains_key(&event)
    }

    /// Invoke the handler registered for the payload's event.
    ///
    /// The handler is called outside the lock so it may register or remove
    /// handlers itself. Returns `false` if no handler was registered.
    pub fn dispatch(&self, payload: Payload) -> bool {
        let event = payload.event();
        let handler =
            self.handlers.lock().unwrap_or_else(PoisonError::into_inner).get(&event).cloned();

        match handler {
            Some(handler) => {
                handler(payload);
                true
            },
            None => {
                tracing::debug!(%event, "no handler registered, dropping event");
                false
            },
        }
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut events: Vec<EventName> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        events.sort_unstable();
        f.debug_struct("HandlerTable").field("events", &events).finish()
    }
}

//! In-process [`Transport`] bound to a [`LocalRelay`].

use roomchat_client::{EventHandler, HandlerTable, Transport, TransportError};
use roomchat_proto::{EventName, Payload};

use crate::local_relay::{ConnectionId, LocalRelay};

/// Transport delivering events through a shared [`LocalRelay`].
///
/// Handlers registered with [`Transport::on`] survive reconnects. Inbound
/// events are dispatched synchronously from within the emitting call of
/// whichever transport caused them.
#[derive(Debug)]
pub struct MemoryTransport {
    relay: LocalRelay,
    handlers: HandlerTable,
    id: Option<ConnectionId>,
}

impl MemoryTransport {
    /// Create a disconnected transport on `relay`.
    pub fn new(relay: LocalRelay) -> Self {
        Self { relay, handlers: HandlerTable::new(), id: None }
    }

    /// Relay connection id while connected.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// The relay this transport talks to.
    pub fn relay(&self) -> &LocalRelay {
        &self.relay
    }
}

impl Transport for MemoryTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.is_connected() {
            return Ok(());
        }
        let id = self
            .relay
            .attach(self.handlers.clone())
            .ok_or_else(|| TransportError::Connection("relay is shut down".to_string()))?;
        self.id = Some(id);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(id) = self.id.take() {
            self.relay.detach(id);
        }
    }

    fn is_connected(&self) -> bool {
        self.id.is_some_and(|id| self.relay.is_attached(id))
    }

    async fn emit(&mut self, payload: Payload) -> Result<(), TransportError> {
        let id = self.id.ok_or(TransportError::NotConnected)?;
        if self.relay.receive(id, payload) {
            Ok(())
        } else {
            self.id = None;
            Err(TransportError::Closed)
        }
    }

    fn on(&mut self, event: EventName, handler: EventHandler) {
        self.handlers.set(event, handler);
    }

    fn off(&mut self, event: EventName) {
        self.handlers.remove(event);
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

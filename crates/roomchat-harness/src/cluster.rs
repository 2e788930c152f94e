//! Multi-client cluster over one in-memory relay.
//!
//! Each client is a real [`ChatSession`] on a [`MemoryTransport`]. Relay
//! deliveries only enqueue inbound events; [`TestCluster::settle`] applies
//! them until every queue is empty.

use roomchat_client::{ChatSession, DisplayMessage, SessionError};
use roomchat_proto::FileRef;

use crate::{LocalRelay, MemoryTransport, SimEnv};

/// Session type used by the cluster.
pub type SimSession = ChatSession<MemoryTransport, SimEnv>;

/// Simulated set of clients sharing a relay and a seeded environment.
pub struct TestCluster {
    relay: LocalRelay,
    /// Sessions, indexed by client number.
    pub clients: Vec<SimSession>,
}

impl TestCluster {
    /// Create `num_clients` disconnected sessions.
    pub fn new(seed: u64, num_clients: usize) -> Self {
        let relay = LocalRelay::new();
        let env = SimEnv::with_seed(seed);
        let clients = (0..num_clients)
            .map(|_| ChatSession::new(MemoryTransport::new(relay.clone()), env.clone()))
            .collect();

        Self { relay, clients }
    }

    /// The shared relay.
    pub fn relay(&self) -> &LocalRelay {
        &self.relay
    }

    /// Connect every client.
    ///
    /// # Errors
    ///
    /// Returns the first connection failure.
    pub async fn connect_all(&mut self) -> Result<(), SessionError> {
        for client in &mut self.clients {
            client.connect().await?;
        }
        Ok(())
    }

    /// Join client `idx` to `room` and settle.
    ///
    /// # Errors
    ///
    /// Returns an error if the join or settling fails.
    pub async fn join(
        &mut self,
        idx: usize,
        username: &str,
        room: &str,
    ) -> Result<bool, SessionError> {
        let joined = match self.clients.get_mut(idx) {
            Some(client) => client.join(username, room).await?,
            None => return Ok(false),
        };
        self.settle().await?;
        Ok(joined)
    }

    /// Send from client `idx` and settle.
    ///
    /// # Errors
    ///
    /// Returns an error if sending or settling fails.
    pub async fn send(
        &mut self,
        idx: usize,
        text: &str,
        file: Option<FileRef>,
    ) -> Result<bool, SessionError> {
        let sent = match self.clients.get_mut(idx) {
            Some(client) => client.send(text, file).await?.is_some(),
            None => return Ok(false),
        };
        self.settle().await?;
        Ok(sent)
    }

    /// Apply queued inbound events on every client until all queues are
    /// empty. Returns the number of events applied.
    ///
    /// # Errors
    ///
    /// Returns the first session error.
    pub async fn settle(&mut self) -> Result<usize, SessionError> {
        let mut total = 0;
        loop {
            let mut applied = 0;
            for client in &mut self.clients {
                applied += client.drain_inbound().await?;
            }
            if applied == 0 {
                return Ok(total);
            }
            total += applied;
        }
    }

    /// Message log of client `idx`.
    pub fn messages(&self, idx: usize) -> &[DisplayMessage] {
        self.clients.get(idx).map_or(&[], |client| client.messages())
    }

    /// Check that every client joined to `room` shows the same log.
    pub fn logs_agree(&self, room: &str) -> bool {
        let mut logs = self
            .clients
            .iter()
            .filter(|client| client.room() == Some(room))
            .map(|client| client.messages());
        match logs.next() {
            Some(first) => logs.all(|log| log == first),
            None => true,
        }
    }
}

impl std::fmt::Debug for TestCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCluster")
            .field("relay", &self.relay)
            .field("clients", &self.clients.len())
            .finish()
    }
}

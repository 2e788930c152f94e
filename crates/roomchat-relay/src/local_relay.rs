//! In-memory relay.
//!
//! Implements only the relay behaviour the client observes:
//!
//! - `joinRoom`: the joiner receives the room's `roomHistory`, then every
//!   member of the room (joiner included) receives `usersInRoom`. A member
//!   switching rooms also triggers a roster update in the room it left.
//! - `message`: stored in the sender's room history and fanned out to every
//!   member of that room, sender included.
//! - Disconnect: the member is dropped and the room's roster re-broadcast.
//!
//! Delivery is synchronous: handlers run inside the emitting call, after the
//! relay lock is released.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, PoisonError},
};

use roomchat_client::HandlerTable;
use roomchat_proto::{ChatMessage, JoinRoom, Payload, RosterEntry};

/// Identifies one connected transport.
pub type ConnectionId = u64;

/// Default number of messages kept per room.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
struct Member {
    username: String,
    room: String,
}

struct Connection {
    handlers: HandlerTable,
    member: Option<Member>,
}

struct RelayState {
    next_id: ConnectionId,
    connections: BTreeMap<ConnectionId, Connection>,
    history: HashMap<String, Vec<ChatMessage>>,
    history_limit: usize,
    emitted: usize,
    open: bool,
}

type Deliveries = Vec<(HandlerTable, Payload)>;

/// Shared in-memory relay. Clones share state.
#[derive(Clone)]
pub struct LocalRelay {
    state: Arc<Mutex<RelayState>>,
}

impl Default for LocalRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRelay {
    /// Create a relay keeping [`DEFAULT_HISTORY_LIMIT`] messages per room.
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a relay keeping at most `limit` messages per room.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(RelayState {
                next_id: 1,
                connections: BTreeMap::new(),
                history: HashMap::new(),
                history_limit: limit,
                emitted: 0,
                open: true,
            })),
        }
    }

    /// Register a connection delivering to `handlers`.
    ///
    /// Returns `None` once the relay has shut down.
    pub fn attach(&self, handlers: HandlerTable) -> Option<ConnectionId> {
        let mut state = self.lock();
        if !state.open {
            return None;
        }
        let id = state.next_id;
        state.next_id += 1;
        state.connections.insert(id, Connection { handlers, member: None });
        tracing::debug!(id, "relay connection attached");
        Some(id)
    }

    /// Drop a connection. Its room receives an updated roster.
    pub fn detach(&self, id: ConnectionId) {
        let deliveries = {
            let mut state = self.lock();
            match state.connections.remove(&id).and_then(|conn| conn.member) {
                Some(member) => state.roster_deliveries(&member.room),
                None => Vec::new(),
            }
        };
        deliver(deliveries);
    }

    /// Drop every connection and refuse new ones.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.open = false;
        state.connections.clear();
        tracing::debug!("relay shut down");
    }

    /// Check if the relay accepts connections.
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Check if a connection is attached.
    pub fn is_attached(&self, id: ConnectionId) -> bool {
        self.lock().connections.contains_key(&id)
    }

    /// Handle an event emitted by connection `id`.
    ///
    /// Returns `false` if the connection is not attached.
    pub fn receive(&self, id: ConnectionId, payload: Payload) -> bool {
        let deliveries = {
            let mut state = self.lock();
            if !state.connections.contains_key(&id) {
                return false;
            }
            state.emitted += 1;

            match payload {
                Payload::JoinRoom(join) => state.join(id, join),
                Payload::Message(message) => state.relay_message(id, message),
                Payload::UsersInRoom(_) | Payload::RoomHistory(_) => {
                    tracing::debug!(id, "relay ignoring server-only event from client");
                    Vec::new()
                },
            }
        };
        deliver(deliveries);
        true
    }

    /// Deliver `payload` to every member of `room`, bypassing the relay
    /// logic. Used to inject foreign or malformed traffic.
    pub fn broadcast(&self, room: &str, payload: Payload) {
        let deliveries: Deliveries = self
            .lock()
            .members_of(room)
            .map(|conn| (conn.handlers.clone(), payload.clone()))
            .collect();
        deliver(deliveries);
    }

    /// Stored history of `room`.
    pub fn history(&self, room: &str) -> Vec<ChatMessage> {
        self.lock().history.get(room).cloned().unwrap_or_default()
    }

    /// Current roster of `room`.
    pub fn roster(&self, room: &str) -> Vec<RosterEntry> {
        self.lock().roster(room)
    }

    /// Number of events received from clients.
    pub fn emitted(&self) -> usize {
        self.lock().emitted
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LocalRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("LocalRelay")
            .field("connections", &state.connections.len())
            .field("rooms", &state.history.len())
            .finish()
    }
}

impl RelayState {
    fn join(&mut self, id: ConnectionId, join: JoinRoom) -> Deliveries {
        let JoinRoom { username, room } = join;
        let Some(conn) = self.connections.get_mut(&id) else {
            return Vec::new();
        };

        let previous = conn.member.replace(Member { username, room: room.clone() });
        let handlers = conn.handlers.clone();
        tracing::debug!(id, %room, "relay member joined");

        let mut deliveries = Vec::new();
        if let Some(previous) = previous.filter(|prev| prev.room != room) {
            deliveries.extend(self.roster_deliveries(&previous.room));
        }

        let history = self.history.get(&room).cloned().unwrap_or_default();
        deliveries.push((handlers, Payload::RoomHistory(history)));
        deliveries.extend(self.roster_deliveries(&room));
        deliveries
    }

    fn relay_message(&mut self, id: ConnectionId, message: ChatMessage) -> Deliveries {
        let Some(room) =
            self.connections.get(&id).and_then(|conn| conn.member.as_ref()).map(|m| m.room.clone())
        else {
            tracing::debug!(id, "relay dropping message from member outside any room");
            return Vec::new();
        };

        let limit = self.history_limit;
        let log = self.history.entry(room.clone()).or_default();
        log.push(message.clone());
        if log.len() > limit {
            let excess = log.len() - limit;
            log.drain(..excess);
        }

        self.members_of(&room)
            .map(|conn| (conn.handlers.clone(), Payload::Message(message.clone())))
            .collect()
    }

    fn roster(&self, room: &str) -> Vec<RosterEntry> {
        self.connections
            .values()
            .filter_map(|conn| conn.member.as_ref())
            .filter(|member| member.room == room)
            .map(|member| RosterEntry::new(member.username.clone()))
            .collect()
    }

    fn roster_deliveries(&self, room: &str) -> Deliveries {
        let roster = self.roster(room);
        self.members_of(room)
            .map(|conn| (conn.handlers.clone(), Payload::UsersInRoom(roster.clone())))
            .collect()
    }

    fn members_of<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .values()
            .filter(move |conn| conn.member.as_ref().is_some_and(|member| member.room == room))
    }
}

fn deliver(deliveries: Deliveries) {
    for (handlers, payload) in deliveries {
        handlers.dispatch(payload);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use roomchat_proto::EventName;

    use super::*;

    fn recording() -> (HandlerTable, Arc<Mutex<Vec<Payload>>>) {
        let table = HandlerTable::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for event in EventName::ALL {
            let log = Arc::clone(&log);
            table.set(event, Arc::new(move |p| log.lock().unwrap().push(p)));
        }
        (table, log)
    }

    fn join(username: &str, room: &str) -> Payload {
        Payload::JoinRoom(JoinRoom { username: username.into(), room: room.into() })
    }

    fn msg(from: &str, room: &str) -> Payload {
        Payload::Message(ChatMessage { from: from.into(), room: room.into(), text: None, file: None })
    }

    #[test]
    fn join_sends_history_then_roster() {
        let relay = LocalRelay::new();
        let (table, log) = recording();
        let id = relay.attach(table).unwrap();

        assert!(relay.receive(id, join("alice", "lobby")));

        let log = log.lock().unwrap();
        assert_eq!(log.as_slice(), &[
            Payload::RoomHistory(vec![]),
            Payload::UsersInRoom(vec![RosterEntry::new("alice")]),
        ]);
    }

    #[test]
    fn messages_fan_out_to_room_including_sender() {
        let relay = LocalRelay::new();
        let (a, a_log) = recording();
        let (b, b_log) = recording();
        let (c, c_log) = recording();
        let a_id = relay.attach(a).unwrap();
        let b_id = relay.attach(b).unwrap();
        let c_id = relay.attach(c).unwrap();
        relay.receive(a_id, join("a", "lobby"));
        relay.receive(b_id, join("b", "lobby"));
        relay.receive(c_id, join("c", "elsewhere"));

        relay.receive(a_id, msg("a", "lobby"));

        let count = |log: &Arc<Mutex<Vec<Payload>>>| {
            log.lock().unwrap().iter().filter(|p| matches!(p, Payload::Message(_))).count()
        };
        assert_eq!(count(&a_log), 1);
        assert_eq!(count(&b_log), 1);
        assert_eq!(count(&c_log), 0);
        assert_eq!(relay.history("lobby").len(), 1);
    }

    #[test]
    fn history_is_bounded() {
        let relay = LocalRelay::with_history_limit(2);
        let (table, _log) = recording();
        let id = relay.attach(table).unwrap();
        relay.receive(id, join("a", "lobby"));

        for i in 0..5 {
            relay.receive(id, msg(&i.to_string(), "lobby"));
        }

        let froms: Vec<_> = relay.history("lobby").into_iter().map(|m| m.from).collect();
        assert_eq!(froms, vec!["3", "4"]);
    }

    #[test]
    fn switching_rooms_updates_old_roster() {
        let relay = LocalRelay::new();
        let (a, _) = recording();
        let (b, b_log) = recording();
        let a_id = relay.attach(a).unwrap();
        let b_id = relay.attach(b).unwrap();
        relay.receive(a_id, join("a", "lobby"));
        relay.receive(b_id, join("b", "lobby"));

        relay.receive(a_id, join("a", "other"));

        assert_eq!(relay.roster("lobby"), vec![RosterEntry::new("b")]);
        assert_eq!(
            b_log.lock().unwrap().last(),
            Some(&Payload::UsersInRoom(vec![RosterEntry::new("b")]))
        );
    }

    #[test]
    fn detach_updates_roster() {
        let relay = LocalRelay::new();
        let (a, _) = recording();
        let (b, _) = recording();
        let a_id = relay.attach(a).unwrap();
        let b_id = relay.attach(b).unwrap();
        relay.receive(a_id, join("a", "lobby"));
        relay.receive(b_id, join("b", "lobby"));

        relay.detach(a_id);

        assert!(!relay.is_attached(a_id));
        assert_eq!(relay.roster("lobby"), vec![RosterEntry::new("b")]);
    }

    #[test]
    fn message_outside_room_is_dropped() {
        let relay = LocalRelay::new();
        let (table, log) = recording();
        let id = relay.attach(table).unwrap();

        assert!(relay.receive(id, msg("a", "lobby")));

        assert!(log.lock().unwrap().is_empty());
        assert!(relay.history("lobby").is_empty());
    }

    #[test]
    fn shutdown_refuses_connections() {
        let relay = LocalRelay::new();
        let (table, _) = recording();
        let id = relay.attach(table.clone()).unwrap();

        relay.shutdown();

        assert!(!relay.is_open());
        assert!(!relay.is_attached(id));
        assert!(relay.attach(table).is_none());
    }

    #[test]
    fn unknown_connection_is_rejected() {
        let relay = LocalRelay::new();

        assert!(!relay.receive(42, join("a", "lobby")));
        assert_eq!(relay.emitted(), 0);
    }
}

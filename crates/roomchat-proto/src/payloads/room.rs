//! Room membership payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Presence announcement sent when joining a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoom {
    /// Display name of the participant.
    pub username: String,
    /// Room identifier.
    pub room: String,
}

/// One participant in a roster snapshot.
///
/// The relay may attach extra fields (connection ids, timestamps). They are
/// preserved opaquely in `extra` and never interpreted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Display name of the participant.
    pub username: String,
    /// Relay-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RosterEntry {
    /// Roster entry with no relay-specific fields.
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into(), extra: Map::new() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn join_room_wire_shape() {
        let join = JoinRoom { username: "alice".into(), room: "lobby".into() };

        assert_eq!(serde_json::to_value(&join).unwrap(), json!({"username": "alice", "room": "lobby"}));
    }

    #[test]
    fn roster_entry_preserves_extra_fields() {
        let value = json!({"username": "bob", "id": "xyz", "joinedAt": 1700000000});
        let entry: RosterEntry = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(entry.username, "bob");
        assert_eq!(entry.extra.get("id"), Some(&json!("xyz")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }

    #[test]
    fn roster_entry_requires_username() {
        assert!(serde_json::from_value::<RosterEntry>(json!({"id": "xyz"})).is_err());
    }
}

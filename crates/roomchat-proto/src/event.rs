//! Channel event names.
//!
//! The string forms are the wire contract with the relay and must not change.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Name of a realtime channel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventName {
    /// Announce presence in a room (outbound).
    #[serde(rename = "joinRoom")]
    JoinRoom,
    /// A single chat message (both directions).
    #[serde(rename = "message")]
    Message,
    /// Full roster snapshot of the room (inbound).
    #[serde(rename = "usersInRoom")]
    UsersInRoom,
    /// Bulk snapshot of prior messages (inbound).
    #[serde(rename = "roomHistory")]
    RoomHistory,
}

impl EventName {
    /// All event names in the contract.
    pub const ALL: [Self; 4] = [Self::JoinRoom, Self::Message, Self::UsersInRoom, Self::RoomHistory];

    /// Wire name of the event.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JoinRoom => "joinRoom",
            Self::Message => "message",
            Self::UsersInRoom => "usersInRoom",
            Self::RoomHistory => "roomHistory",
        }
    }

    /// Events the relay sends to clients.
    pub const fn is_inbound(self) -> bool {
        matches!(self, Self::Message | Self::UsersInRoom | Self::RoomHistory)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownEvent(s.to_string()))
    }
}

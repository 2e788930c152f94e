//! Event envelopes.
//!
//! An [`Envelope`] is the unit the transport moves: an event name plus its
//! JSON payload. [`Payload`] is the typed view of an envelope.
//!
//! # Invariants
//!
//! Each payload variant maps to exactly one [`EventName`] (enforced by match
//! exhaustiveness). `message` is the only event used in both directions and
//! has the same shape either way.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ChatMessage, EventName, JoinRoom, RosterEntry,
    errors::{ProtocolError, Result},
};

/// Event name and untyped payload as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Wire name of the event.
    pub event: String,
    /// Event payload.
    pub payload: Value,
}

impl Envelope {
    /// Maximum encoded size of one envelope (1 MiB).
    ///
    /// Text is small and file bytes never travel inline, so anything larger
    /// is rejected before parsing.
    pub const MAX_SIZE: usize = 1024 * 1024;

    /// Encode to JSON bytes.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Json` if serialization fails
    /// - `ProtocolError::PayloadTooLarge` if the result exceeds [`Self::MAX_SIZE`]
    pub fn encode(&self) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec(self)?;
        if bytes.len() > Self::MAX_SIZE {
            return Err(ProtocolError::PayloadTooLarge { size: bytes.len(), max: Self::MAX_SIZE });
        }
        Ok(bytes)
    }

    /// Decode from JSON bytes.
    ///
    /// The size check happens before parsing so oversized input is never
    /// handed to the JSON parser.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if `bytes` exceed [`Self::MAX_SIZE`]
    /// - `ProtocolError::Json` if the bytes are not an envelope
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > Self::MAX_SIZE {
            return Err(ProtocolError::PayloadTooLarge { size: bytes.len(), max: Self::MAX_SIZE });
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Typed event name. Fails for names outside the contract.
    pub fn event_name(&self) -> Result<EventName> {
        self.event.parse()
    }
}

/// Typed channel event.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `joinRoom`
    JoinRoom(JoinRoom),
    /// `message`
    Message(ChatMessage),
    /// `usersInRoom`
    UsersInRoom(Vec<RosterEntry>),
    /// `roomHistory`
    RoomHistory(Vec<ChatMessage>),
}

impl Payload {
    /// Event name corresponding to this payload.
    pub const fn event(&self) -> EventName {
        match self {
            Self::JoinRoom(_) => EventName::JoinRoom,
            Self::Message(_) => EventName::Message,
            Self::UsersInRoom(_) => EventName::UsersInRoom,
            Self::RoomHistory(_) => EventName::RoomHistory,
        }
    }

    /// Wrap into a wire envelope.
    pub fn into_envelope(self) -> Result<Envelope> {
        let event = self.event().as_str().to_string();
        let payload = match self {
            Self::JoinRoom(inner) => serde_json::to_value(inner),
            Self::Message(inner) => serde_json::to_value(inner),
            Self::UsersInRoom(inner) => serde_json::to_value(inner),
            Self::RoomHistory(inner) => serde_json::to_value(inner),
        }?;

        Ok(Envelope { event, payload })
    }

    /// Parse the typed payload out of an envelope.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownEvent` if the event is not in the contract
    /// - `ProtocolError::Json` if the payload does not match the event's shape
    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        let Envelope { event, payload } = envelope;

        let typed = match event.parse::<EventName>()? {
            EventName::JoinRoom => Self::JoinRoom(serde_json::from_value(payload)?),
            EventName::Message => Self::Message(serde_json::from_value(payload)?),
            EventName::UsersInRoom => Self::UsersInRoom(serde_json::from_value(payload)?),
            EventName::RoomHistory => Self::RoomHistory(serde_json::from_value(payload)?),
        };

        Ok(typed)
    }

    /// Encode straight to wire bytes.
    pub fn encode(self) -> Result<Vec<u8>> {
        self.into_envelope()?.encode()
    }

    /// Decode straight from wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::from_envelope(Envelope::decode(bytes)?)
    }
}

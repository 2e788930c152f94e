//! Property-based tests for envelope encoding/decoding
//!
//! These tests verify that event serialization holds for all valid inputs,
//! and that arbitrary bytes from the network never cause a panic.

use proptest::prelude::*;
use roomchat_proto::{
    ChatMessage, EncryptedText, Envelope, EventName, FileRef, JoinRoom, Payload, RosterEntry,
    WireText,
};
use serde_json::json;

fn arbitrary_file() -> impl Strategy<Value = FileRef> {
    ("[a-z]{1,8}\\.[a-z]{2,4}", "(image|video|audio|application)/[a-z0-9.+-]{1,12}", "[a-z:/._-]{1,32}")
        .prop_map(|(name, mime_type, url)| FileRef { name, mime_type, url })
}

fn arbitrary_text() -> impl Strategy<Value = WireText> {
    (prop::collection::vec(any::<u8>(), 12), prop::collection::vec(any::<u8>(), 16..128))
        .prop_map(|(iv, data)| EncryptedText { iv, data }.into())
}

fn arbitrary_message() -> impl Strategy<Value = ChatMessage> {
    (".{1,16}", ".{1,16}", prop::option::of(arbitrary_text()), prop::option::of(arbitrary_file()))
        .prop_map(|(from, room, text, file)| ChatMessage { from, room, text, file })
}

fn arbitrary_payload() -> impl Strategy<Value = Payload> {
    prop_oneof![
        (".{1,16}", ".{1,16}")
            .prop_map(|(username, room)| Payload::JoinRoom(JoinRoom { username, room })),
        arbitrary_message().prop_map(Payload::Message),
        prop::collection::vec(".{1,16}".prop_map(RosterEntry::new), 0..8)
            .prop_map(Payload::UsersInRoom),
        prop::collection::vec(arbitrary_message(), 0..8).prop_map(Payload::RoomHistory),
    ]
}

proptest! {
    #[test]
    fn prop_payload_round_trip(payload in arbitrary_payload()) {
        let event = payload.event();
        let bytes = payload.clone().encode()?;
        let decoded = Payload::decode(&bytes)?;

        prop_assert_eq!(decoded.event(), event);
        prop_assert_eq!(decoded, payload);
    }

    #[test]
    fn prop_envelope_event_matches_variant(payload in arbitrary_payload()) {
        let event = payload.event();
        let envelope = payload.into_envelope()?;

        prop_assert_eq!(envelope.event_name()?, event);
        prop_assert_eq!(envelope.event.as_str(), event.as_str());
    }

    #[test]
    fn prop_history_survives_out_of_range_bytes(
        good in prop::collection::vec(arbitrary_message(), 0..4),
        bad_iv in prop::collection::vec(0u32..1024, 1..16),
        position in any::<prop::sample::Index>(),
    ) {
        let mut entries: Vec<_> =
            good.iter().map(|m| serde_json::to_value(m).unwrap()).collect();
        let at = position.index(entries.len() + 1);
        entries.insert(at, json!({"from": "x", "room": "r", "text": {"iv": bad_iv, "data": [1]}}));
        let bytes = serde_json::to_vec(&json!({"event": "roomHistory", "payload": entries}))?;

        let Payload::RoomHistory(history) = Payload::decode(&bytes)? else {
            return Err(TestCaseError::fail("expected history"));
        };

        prop_assert_eq!(history.len(), good.len() + 1);
        prop_assert_eq!(&history[..at], &good[..at]);
        prop_assert_eq!(&history[at + 1..], &good[at..]);
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Payload::decode(&bytes);
    }

    #[test]
    fn prop_unknown_events_rejected(name in "[a-zA-Z]{1,16}") {
        prop_assume!(EventName::ALL.iter().all(|e| e.as_str() != name));

        let envelope = Envelope { event: name, payload: serde_json::Value::Null };
        prop_assert!(Payload::from_envelope(envelope).is_err());
    }
}

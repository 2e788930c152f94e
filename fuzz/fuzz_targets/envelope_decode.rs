//! Fuzz target for wire envelope decoding
//!
//! Feeds arbitrary bytes to `Envelope::decode` and `Payload::decode`:
//! - Malformed or truncated JSON
//! - Unknown event names
//! - Payload shapes that do not match the event
//! - Oversized input
//!
//! The fuzzer should NEVER panic. Every accepted payload must survive a
//! re-encode unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomchat_proto::{Envelope, Payload};

fuzz_target!(|data: &[u8]| {
    let _ = Envelope::decode(data).map(|envelope| envelope.event_name());

    if let Ok(payload) = Payload::decode(data) {
        let encoded = payload.clone().encode().expect("decoded payload must re-encode");
        let decoded = Payload::decode(&encoded).expect("re-encoded payload must decode");
        assert_eq!(decoded, payload);
    }
});

//! Fuzz target for text sealing and opening
//!
//! # Strategy
//!
//! - Arbitrary keys, nonces and plaintexts sealed then opened
//! - Arbitrary wire parts (any IV length, any ciphertext) opened directly
//! - Single-bit corruption of valid ciphertext
//!
//! # Invariants
//!
//! - Opening never panics
//! - Seal then open returns the plaintext
//! - IVs of the wrong length are rejected before decryption
//! - Corrupted ciphertext fails authentication

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roomchat_crypto::{
    decrypt_text, encrypt_text, RoomKey, SealedText, KEY_SIZE, NONCE_SIZE,
};

#[derive(Debug, Arbitrary)]
struct Scenario {
    key: [u8; KEY_SIZE],
    nonce: [u8; NONCE_SIZE],
    plaintext: String,
    wire_iv: Vec<u8>,
    wire_data: Vec<u8>,
    flip_at: usize,
}

fuzz_target!(|scenario: Scenario| {
    let key = RoomKey::from_bytes(scenario.key);

    let sealed = encrypt_text(&scenario.plaintext, &key, scenario.nonce);
    let opened = decrypt_text(&sealed, &key).expect("sealed text must open");
    assert_eq!(opened, scenario.plaintext);

    let mut corrupted = sealed.clone();
    let index = scenario.flip_at % corrupted.ciphertext.len();
    corrupted.ciphertext[index] ^= 1;
    assert!(decrypt_text(&corrupted, &key).is_err());

    match SealedText::from_parts(&scenario.wire_iv, scenario.wire_data) {
        Ok(wire) => {
            assert_eq!(scenario.wire_iv.len(), NONCE_SIZE);
            let _ = decrypt_text(&wire, &key);
        },
        Err(_) => assert_ne!(scenario.wire_iv.len(), NONCE_SIZE),
    }
});

//! Property-based tests for the room cipher.
//!
//! Derivation runs 100k PBKDF2 iterations, so properties that derive keys
//! use a reduced case count. Cipher-only properties use raw key material.

use proptest::prelude::*;
use roomchat_crypto::{
    CryptoError, KEY_SIZE, NONCE_SIZE, RoomKey, SealedText, TAG_SIZE, decrypt_text, encrypt_text,
};

fn key_strategy() -> impl Strategy<Value = RoomKey> {
    any::<[u8; KEY_SIZE]>().prop_map(RoomKey::from_bytes)
}

proptest! {
    #[test]
    fn prop_roundtrip_any_text(
        plaintext in ".{0,256}",
        key in key_strategy(),
        nonce in any::<[u8; NONCE_SIZE]>(),
    ) {
        let sealed = encrypt_text(&plaintext, &key, nonce);

        prop_assert_eq!(sealed.ciphertext.len(), plaintext.len() + TAG_SIZE);
        prop_assert_eq!(decrypt_text(&sealed, &key)?, plaintext);
    }

    #[test]
    fn prop_wrong_key_never_opens(
        plaintext in ".{0,64}",
        key_a in key_strategy(),
        key_b in key_strategy(),
        nonce in any::<[u8; NONCE_SIZE]>(),
    ) {
        prop_assume!(key_a != key_b);

        let sealed = encrypt_text(&plaintext, &key_a, nonce);
        let is_auth_failure = matches!(
            decrypt_text(&sealed, &key_b),
            Err(CryptoError::DecryptionFailed { .. })
        );
        prop_assert!(is_auth_failure);
    }

    #[test]
    fn prop_any_bit_flip_is_detected(
        plaintext in ".{1,64}",
        key in key_strategy(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        flip_index in any::<prop::sample::Index>(),
        flip_bit in 0u8..8,
    ) {
        let mut sealed = encrypt_text(&plaintext, &key, nonce);
        let idx = flip_index.index(sealed.ciphertext.len());
        sealed.ciphertext[idx] ^= 1 << flip_bit;

        prop_assert!(decrypt_text(&sealed, &key).is_err());
    }

    #[test]
    fn prop_arbitrary_wire_bytes_never_panic(
        iv in prop::collection::vec(any::<u8>(), 0..32),
        data in prop::collection::vec(any::<u8>(), 0..128),
        key in key_strategy(),
    ) {
        if let Ok(sealed) = SealedText::from_parts(&iv, data) {
            let _ = decrypt_text(&sealed, &key);
        } else {
            prop_assert_ne!(iv.len(), NONCE_SIZE);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_derived_key_roundtrip(room in "[a-z0-9-]{1,24}", plaintext in ".{0,64}") {
        let key = RoomKey::derive(&room);
        let sealed = encrypt_text(&plaintext, &key, [0x42; NONCE_SIZE]);

        prop_assert_eq!(decrypt_text(&sealed, &RoomKey::derive(&room))?, plaintext);
    }

    #[test]
    fn prop_distinct_rooms_distinct_keys(a in "[a-z]{1,12}", b in "[a-z]{1,12}") {
        prop_assume!(a != b);

        prop_assert_ne!(RoomKey::derive(&a), RoomKey::derive(&b));
    }
}

//! Property tests for the chat session over a recording transport.

use proptest::prelude::*;
use roomchat_client::{
    ChatSession, EventHandler, HandlerTable, PLACEHOLDER_TEXT, SystemEnv, Transport,
    TransportError,
};
use roomchat_crypto::{RoomKey, encrypt_text};
use roomchat_proto::{ChatMessage, EncryptedText, EventName, Payload, WireText};

#[derive(Default)]
struct Recorder {
    emitted: Vec<Payload>,
    handlers: HandlerTable,
}

impl Transport for Recorder {
    async fn connect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn disconnect(&mut self) {}

    fn is_connected(&self) -> bool {
        true
    }

    async fn emit(&mut self, payload: Payload) -> Result<(), TransportError> {
        self.emitted.push(payload);
        Ok(())
    }

    fn on(&mut self, event: EventName, handler: EventHandler) {
        self.handlers.set(event, handler);
    }

    fn off(&mut self, event: EventName) {
        self.handlers.remove(event);
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

fn session() -> ChatSession<Recorder, SystemEnv> {
    ChatSession::new(Recorder::default(), SystemEnv::new())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn sent_text_reads_back_for_room_members(
        room in "[a-z]{1,12}",
        text in "[ -~]{0,64}",
    ) {
        let rt = runtime();
        rt.block_on(async {
            let mut sender = session();
            let mut reader = session();
            sender.join("alice", &room).await.unwrap();
            reader.join("bob", &room).await.unwrap();

            let sent = sender.send(&text, None).await.unwrap();
            let trimmed = text.trim();

            if trimmed.is_empty() {
                prop_assert!(sent.is_none());
                prop_assert_eq!(sender.transport().emitted.len(), 1);
            } else {
                let shown = reader.receive_message(sent.unwrap()).await.unwrap().unwrap();
                prop_assert_eq!(shown.text.as_deref(), Some(trimmed));
            }
            Ok(())
        })?;
    }

    #[test]
    fn history_keeps_order_and_length(
        entries in prop::collection::vec((any::<bool>(), "[a-z ]{1,20}"), 0..12),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let mut reader = session();
            reader.join("bob", "lobby").await.unwrap();

            let lobby = RoomKey::derive("lobby");
            let stranger = RoomKey::from_bytes([9u8; 32]);
            let batch: Vec<ChatMessage> = entries
                .iter()
                .enumerate()
                .map(|(i, (ours, text))| {
                    let key = if *ours { &lobby } else { &stranger };
                    let sealed = encrypt_text(text, key, [i as u8; 12]);
                    ChatMessage {
                        from: format!("user{i}"),
                        room: "lobby".to_string(),
                        text: Some(WireText::Sealed(EncryptedText {
                            iv: sealed.nonce.to_vec(),
                            data: sealed.ciphertext,
                        })),
                        file: None,
                    }
                })
                .collect();

            prop_assert_eq!(reader.receive_history(batch).await.unwrap(), entries.len());
            prop_assert_eq!(reader.messages().len(), entries.len());

            for (i, (shown, (ours, text))) in reader.messages().iter().zip(&entries).enumerate() {
                prop_assert_eq!(&shown.from, &format!("user{i}"));
                let expected = if *ours { text.as_str() } else { PLACEHOLDER_TEXT };
                prop_assert_eq!(shown.text.as_deref(), Some(expected));
            }
            Ok(())
        })?;
    }
}

#[tokio::test]
async fn repeated_sends_never_reuse_a_nonce() {
    let mut sender = session();
    sender.join("alice", "lobby").await.unwrap();

    let mut nonces = std::collections::HashSet::new();
    for _ in 0..64 {
        let sent = sender.send("same text", None).await.unwrap().unwrap();
        let iv = sent.text.as_ref().and_then(WireText::as_sealed).unwrap().iv.clone();
        assert!(nonces.insert(iv), "nonce reused");
    }
}

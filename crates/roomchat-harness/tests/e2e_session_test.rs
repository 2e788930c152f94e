//! End-to-end session tests over the in-memory relay.
//!
//! Every client is a real `ChatSession`: messages are encrypted by the
//! sender, fanned out by the relay as ciphertext and decrypted by each
//! receiver with the key it derived from the room name.

use roomchat_client::{PLACEHOLDER_TEXT, SessionUpdate};
use roomchat_crypto::{RoomKey, encrypt_text};
use roomchat_harness::TestCluster;
use roomchat_proto::{ChatMessage, EncryptedText, FileRef, Payload, RosterEntry, WireText};

fn texts(cluster: &TestCluster, idx: usize) -> Vec<Option<String>> {
    cluster.messages(idx).iter().map(|m| m.text.clone()).collect()
}

async fn two_in_lobby(seed: u64) -> TestCluster {
    let mut cluster = TestCluster::new(seed, 2);
    cluster.connect_all().await.unwrap();
    assert!(cluster.join(0, "alice", "lobby").await.unwrap());
    assert!(cluster.join(1, "bob", "lobby").await.unwrap());
    cluster
}

#[tokio::test]
async fn message_roundtrip_between_members() {
    let mut cluster = two_in_lobby(1).await;

    assert!(cluster.send(0, "hello bob", None).await.unwrap());

    assert_eq!(texts(&cluster, 0), vec![Some("hello bob".to_string())]);
    assert_eq!(texts(&cluster, 1), vec![Some("hello bob".to_string())]);
    assert_eq!(cluster.messages(1)[0].from, "alice");
    assert!(cluster.logs_agree("lobby"));
}

#[tokio::test]
async fn relay_only_sees_ciphertext() {
    let mut cluster = two_in_lobby(2).await;

    cluster.send(0, "secret plans", None).await.unwrap();

    let stored = cluster.relay().history("lobby");
    assert_eq!(stored.len(), 1);
    let text = stored[0].text.as_ref().and_then(WireText::as_sealed).unwrap();
    assert_eq!(text.iv.len(), 12);
    assert!(!String::from_utf8_lossy(&text.data).contains("secret plans"));
}

#[tokio::test]
async fn roster_tracks_membership() {
    let mut cluster = two_in_lobby(3).await;

    let expected = vec![RosterEntry::new("alice"), RosterEntry::new("bob")];
    assert_eq!(cluster.clients[0].roster(), expected.as_slice());
    assert_eq!(cluster.clients[1].roster(), expected.as_slice());

    cluster.clients[1].disconnect();
    cluster.settle().await.unwrap();

    assert_eq!(cluster.clients[0].roster(), &[RosterEntry::new("alice")]);
}

#[tokio::test]
async fn late_joiner_receives_history_in_order() {
    let mut cluster = TestCluster::new(4, 2);
    cluster.connect_all().await.unwrap();
    cluster.join(0, "alice", "lobby").await.unwrap();

    for text in ["one", "two", "three"] {
        cluster.send(0, text, None).await.unwrap();
    }
    cluster.join(1, "bob", "lobby").await.unwrap();

    assert_eq!(texts(&cluster, 1), vec![
        Some("one".to_string()),
        Some("two".to_string()),
        Some("three".to_string()),
    ]);
    assert!(cluster.logs_agree("lobby"));
}

#[tokio::test]
async fn rooms_are_isolated() {
    let mut cluster = TestCluster::new(5, 2);
    cluster.connect_all().await.unwrap();
    cluster.join(0, "alice", "lobby").await.unwrap();
    cluster.join(1, "bob", "elsewhere").await.unwrap();

    cluster.send(0, "lobby only", None).await.unwrap();

    assert_eq!(cluster.messages(0).len(), 1);
    assert!(cluster.messages(1).is_empty());
}

#[tokio::test]
async fn foreign_key_shows_placeholder() {
    let mut cluster = two_in_lobby(6).await;

    let wrong_key = RoomKey::derive("not-the-lobby");
    let sealed = encrypt_text("hidden", &wrong_key, [9; 12]);
    cluster.relay().broadcast(
        "lobby",
        Payload::Message(ChatMessage {
            from: "mallory".to_string(),
            room: "lobby".to_string(),
            text: Some(EncryptedText { iv: sealed.nonce.to_vec(), data: sealed.ciphertext }.into()),
            file: None,
        }),
    );
    cluster.settle().await.unwrap();

    for idx in 0..2 {
        let messages = cluster.messages(idx);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text.as_deref(), Some(PLACEHOLDER_TEXT));
        assert!(messages[0].is_undecryptable());
    }
}

#[tokio::test]
async fn malformed_iv_shows_placeholder() {
    let mut cluster = two_in_lobby(7).await;

    cluster.relay().broadcast(
        "lobby",
        Payload::Message(ChatMessage {
            from: "mallory".to_string(),
            room: "lobby".to_string(),
            text: Some(EncryptedText { iv: vec![1, 2, 3], data: vec![0; 20] }.into()),
            file: None,
        }),
    );
    cluster.settle().await.unwrap();

    assert_eq!(texts(&cluster, 1), vec![Some(PLACEHOLDER_TEXT.to_string())]);
}

#[tokio::test]
async fn empty_send_emits_nothing() {
    let mut cluster = two_in_lobby(8).await;
    let before = cluster.relay().emitted();

    assert!(!cluster.send(0, "   ", None).await.unwrap());

    assert_eq!(cluster.relay().emitted(), before);
    assert!(cluster.messages(1).is_empty());
}

#[tokio::test]
async fn file_only_message_is_relayed() {
    let mut cluster = two_in_lobby(9).await;
    let file = FileRef {
        name: "cat.png".to_string(),
        mime_type: "image/png".to_string(),
        url: "https://files.example/cat.png".to_string(),
    };

    assert!(cluster.send(0, "", Some(file.clone())).await.unwrap());

    let received = &cluster.messages(1)[0];
    assert_eq!(received.text, None);
    assert_eq!(received.file.as_ref(), Some(&file));
}

#[tokio::test]
async fn send_before_join_emits_nothing() {
    let mut cluster = TestCluster::new(10, 1);
    cluster.connect_all().await.unwrap();

    assert!(!cluster.send(0, "hello", None).await.unwrap());
    assert_eq!(cluster.relay().emitted(), 0);
}

#[tokio::test]
async fn switching_rooms_replaces_log_and_roster() {
    let mut cluster = two_in_lobby(11).await;
    cluster.send(0, "in lobby", None).await.unwrap();

    cluster.join(0, "alice", "attic").await.unwrap();

    assert_eq!(cluster.clients[0].room(), Some("attic"));
    assert!(cluster.messages(0).is_empty());
    assert_eq!(cluster.clients[0].roster(), &[RosterEntry::new("alice")]);
    assert_eq!(cluster.clients[1].roster(), &[RosterEntry::new("bob")]);
}

#[tokio::test]
async fn subscribers_observe_updates_in_order() {
    let mut cluster = TestCluster::new(12, 1);
    cluster.connect_all().await.unwrap();
    let mut updates = cluster.clients[0].subscribe();

    cluster.join(0, "alice", "lobby").await.unwrap();
    cluster.send(0, "hi", None).await.unwrap();

    let mut seen = Vec::new();
    while let Ok(update) = updates.try_recv() {
        seen.push(match update {
            SessionUpdate::Joined { .. } => "joined",
            SessionUpdate::HistoryReplaced(_) => "history",
            SessionUpdate::RosterChanged(_) => "roster",
            SessionUpdate::MessageAppended(_) => "message",
        });
    }
    assert_eq!(seen, vec!["joined", "history", "roster", "message"]);
}

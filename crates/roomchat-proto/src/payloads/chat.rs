//! Chat message payloads.
//!
//! These payloads carry user-visible messages: encrypted text and plain file
//! references.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat message as relayed between participants.
///
/// At least one of `text` or `file` is present on messages produced by a
/// well-behaved client, but decoding does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender display name.
    pub from: String,
    /// Room identifier.
    pub room: String,
    /// Encrypted text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<WireText>,
    /// File attachment reference (never encrypted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
}

/// AES-GCM encrypted text in wire form.
///
/// Both fields serialize as JSON arrays of byte values (not base64). The
/// lengths are validated only when the receiver tries to decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedText {
    /// 12-byte nonce.
    pub iv: Vec<u8>,
    /// Ciphertext including the 16-byte authentication tag.
    pub data: Vec<u8>,
}

/// Text body as received.
///
/// A body that is not a well-formed [`EncryptedText`] (byte values out of
/// range, missing fields, wrong JSON type) is kept verbatim as `Malformed`
/// instead of failing the whole payload. One bad entry in a history batch
/// costs that entry only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireText {
    /// Nonce and ciphertext as byte arrays.
    Sealed(EncryptedText),
    /// Anything else, preserved for re-encoding.
    Malformed(Value),
}

impl WireText {
    /// The sealed body, if well-formed.
    pub fn as_sealed(&self) -> Option<&EncryptedText> {
        match self {
            Self::Sealed(text) => Some(text),
            Self::Malformed(_) => None,
        }
    }

    /// Mutable access to the sealed body, if well-formed.
    pub fn as_sealed_mut(&mut self) -> Option<&mut EncryptedText> {
        match self {
            Self::Sealed(text) => Some(text),
            Self::Malformed(_) => None,
        }
    }
}

impl From<EncryptedText> for WireText {
    fn from(text: EncryptedText) -> Self {
        Self::Sealed(text)
    }
}

/// Reference to a file attachment.
///
/// The bytes are not carried in the message; `url` points at wherever the
/// sender's transport made them available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Original file name.
    pub name: String,
    /// MIME type, e.g. `image/png`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Transport-local URL of the file contents.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_message_wire_shape() {
        let msg = ChatMessage {
            from: "alice".into(),
            room: "lobby".into(),
            text: Some(EncryptedText { iv: vec![1, 2, 3], data: vec![200, 255] }.into()),
            file: None,
        };

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "from": "alice",
                "room": "lobby",
                "text": {"iv": [1, 2, 3], "data": [200, 255]},
            })
        );
    }

    #[test]
    fn file_message_uses_type_field() {
        let msg = ChatMessage {
            from: "bob".into(),
            room: "lobby".into(),
            text: None,
            file: Some(FileRef {
                name: "cat.png".into(),
                mime_type: "image/png".into(),
                url: "file:///tmp/cat.png".into(),
            }),
        };

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "from": "bob",
                "room": "lobby",
                "file": {"name": "cat.png", "type": "image/png", "url": "file:///tmp/cat.png"},
            })
        );
    }

    #[test]
    fn missing_optional_fields_decode_as_none() {
        let msg: ChatMessage = serde_json::from_value(json!({"from": "a", "room": "r"})).unwrap();

        assert!(msg.text.is_none());
        assert!(msg.file.is_none());
    }

    #[test]
    fn null_optional_fields_decode_as_none() {
        let msg: ChatMessage =
            serde_json::from_value(json!({"from": "a", "room": "r", "text": null, "file": null}))
                .unwrap();

        assert!(msg.text.is_none());
        assert!(msg.file.is_none());
    }

    #[test]
    fn byte_values_out_of_range_are_kept_as_malformed() {
        let value = json!({"iv": [1, 256], "data": []});

        let text: WireText = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(text, WireText::Malformed(value.clone()));
        assert!(text.as_sealed().is_none());
        assert_eq!(serde_json::to_value(&text).unwrap(), value);
    }

    #[test]
    fn malformed_bodies_do_not_fail_the_message() {
        for body in [
            json!({"iv": [1, 2, 3]}),
            json!({"iv": ["a"], "data": [1]}),
            json!("not an object"),
            json!(42),
        ] {
            let msg: ChatMessage =
                serde_json::from_value(json!({"from": "a", "room": "r", "text": body.clone()}))
                    .unwrap();

            assert_eq!(msg.text, Some(WireText::Malformed(body)));
        }
    }

    #[test]
    fn well_formed_body_decodes_as_sealed() {
        let text: WireText =
            serde_json::from_value(json!({"iv": [0, 255], "data": [7]})).unwrap();

        assert_eq!(text.as_sealed(), Some(&EncryptedText { iv: vec![0, 255], data: vec![7] }));
    }
}

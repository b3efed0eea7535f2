//! Relay frame types.
//!
//! The relay's wire format is JSON text with three kinds of shape:
//!
//! - tagged frames carrying a `type` discriminator (`presign`, `rotate`,
//!   `system`, `count`, `file`)
//! - the upload grant, recognizable by its `presignUrl`/`fileUrl` fields
//! - the bare envelope `{ciphertext, iv}` used for text messages
//!
//! [`ServerFrame::decode`] tries the shapes in that order and rejects
//! anything that matches none of them. Leaf structs deny unknown fields so
//! a frame cannot drift between shapes by carrying extra keys.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Maximum frame text echoed back in decode errors.
const PREVIEW_LEN: usize = 120;

/// Base64 ciphertext and nonce pair as it appears in JSON frames.
///
/// The text form of one `veilroom-crypto` envelope; `iv` is the base64 of
/// the 12-byte nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireEnvelope {
    /// Base64 ciphertext including the authentication tag.
    pub ciphertext: String,

    /// Base64 12-byte nonce.
    pub iv: String,
}

/// Broadcast announcement of an uploaded file.
///
/// Carries everything a participant needs to fetch and decrypt the file
/// except the room key: the blob URL, the nonce the file was sealed with,
/// and the per-file key wrapped under the room key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileAnnouncement {
    /// Alias of the sender.
    pub sender: String,

    /// Original filename.
    pub name: String,

    /// Base64 nonce the file bytes were sealed with.
    pub iv: String,

    /// The per-file key, sealed under the room key.
    pub key: WireEnvelope,

    /// Retrieval URL of the ciphertext blob.
    pub url: String,
}

/// Relay reply to a presign request: where to upload, where peers fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadGrant {
    /// Presigned PUT target for the ciphertext blob.
    #[serde(rename = "presignUrl")]
    pub presign_url: String,

    /// Final retrieval URL to announce to the room.
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

/// Frames a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// Request an upload slot for a named file.
    Presign {
        /// Filename to announce.
        name: String,
    },

    /// Room key rotation announcement, sealed under the outgoing key.
    Rotate(WireEnvelope),

    /// Encrypted text message.
    Message(WireEnvelope),

    /// Announce an uploaded file to the room.
    File(FileAnnouncement),
}

/// Frames the relay delivers to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Upload slot granted in response to a presign request.
    Grant(UploadGrant),

    /// A peer rotated the room key.
    Rotate(WireEnvelope),

    /// Relay-authored notice (join/leave announcements and the like).
    System {
        /// Notice text.
        text: String,
    },

    /// Participant count update.
    Count {
        /// Number of connected participants.
        value: u32,
    },

    /// A peer announced an uploaded file.
    File(FileAnnouncement),

    /// Encrypted text message from a peer.
    Message(WireEnvelope),
}

/// Tagged outbound shapes. Bare message envelopes are serialized directly.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OutboundTagged {
    Presign { name: String },
    Rotate(WireEnvelope),
    File(FileAnnouncement),
}

/// Tagged inbound shapes. `presign` is client-to-relay only and is
/// deliberately absent: a relay echoing one back is an unrecognized frame.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum InboundTagged {
    Rotate(WireEnvelope),
    System { text: String },
    Count { value: u32 },
    File(FileAnnouncement),
}

/// All inbound shapes, tried in order. Untagged fallthrough is an error,
/// never a silent drop.
#[derive(Deserialize)]
#[serde(untagged)]
enum InboundWire {
    Tagged(InboundTagged),
    Grant(UploadGrant),
    Message(WireEnvelope),
}

impl ClientFrame {
    /// Encode the frame as JSON text for the relay socket.
    pub fn encode(&self) -> String {
        let result = match self {
            Self::Presign { name } =>
                serde_json::to_string(&OutboundTagged::Presign { name: name.clone() }),
            Self::Rotate(envelope) =>
                serde_json::to_string(&OutboundTagged::Rotate(envelope.clone())),
            Self::Message(envelope) => serde_json::to_string(envelope),
            Self::File(announcement) =>
                serde_json::to_string(&OutboundTagged::File(announcement.clone())),
        };

        let Ok(json) = result else {
            unreachable!("relay frames serialize infallibly");
        };
        json
    }
}

impl ServerFrame {
    /// Decode relay frame text into its typed shape.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnrecognizedFrame` if the text is not valid JSON
    ///   or matches none of the known shapes
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let wire: InboundWire = serde_json::from_str(text)
            .map_err(|_| ProtocolError::UnrecognizedFrame { preview: preview(text) })?;

        Ok(match wire {
            InboundWire::Tagged(InboundTagged::Rotate(envelope)) => Self::Rotate(envelope),
            InboundWire::Tagged(InboundTagged::System { text }) => Self::System { text },
            InboundWire::Tagged(InboundTagged::Count { value }) => Self::Count { value },
            InboundWire::Tagged(InboundTagged::File(announcement)) => Self::File(announcement),
            InboundWire::Grant(grant) => Self::Grant(grant),
            InboundWire::Message(envelope) => Self::Message(envelope),
        })
    }
}

/// Truncate frame text for error messages.
fn preview(text: &str) -> String {
    if text.len() <= PREVIEW_LEN {
        return text.to_string();
    }

    let mut end = PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> WireEnvelope {
        WireEnvelope { ciphertext: "Y2lwaGVy".to_string(), iv: "bm9uY2Vub25jZQ==".to_string() }
    }

    fn announcement() -> FileAnnouncement {
        FileAnnouncement {
            sender: "ada".to_string(),
            name: "notes.pdf".to_string(),
            iv: "bm9uY2Vub25jZQ==".to_string(),
            key: envelope(),
            url: "https://blobs.example/f/1".to_string(),
        }
    }

    #[test]
    fn presign_wire_shape() {
        let frame = ClientFrame::Presign { name: "notes.pdf".to_string() };
        assert_eq!(frame.encode(), r#"{"type":"presign","name":"notes.pdf"}"#);
    }

    #[test]
    fn rotate_wire_shape() {
        let frame = ClientFrame::Rotate(envelope());
        assert_eq!(
            frame.encode(),
            r#"{"type":"rotate","ciphertext":"Y2lwaGVy","iv":"bm9uY2Vub25jZQ=="}"#
        );
    }

    #[test]
    fn message_wire_shape_is_bare() {
        let frame = ClientFrame::Message(envelope());
        assert_eq!(frame.encode(), r#"{"ciphertext":"Y2lwaGVy","iv":"bm9uY2Vub25jZQ=="}"#);
    }

    #[test]
    fn file_wire_shape() {
        let frame = ClientFrame::File(announcement());
        let json = frame.encode();
        assert!(json.starts_with(r#"{"type":"file","sender":"ada""#));
        assert!(json.contains(r#""key":{"ciphertext":"Y2lwaGVy"#));
        assert!(json.contains(r#""url":"https://blobs.example/f/1""#));
    }

    #[test]
    fn decode_rotate() {
        let frame = ServerFrame::decode(
            r#"{"type":"rotate","ciphertext":"Y2lwaGVy","iv":"bm9uY2Vub25jZQ=="}"#,
        )
        .unwrap();
        assert_eq!(frame, ServerFrame::Rotate(envelope()));
    }

    #[test]
    fn decode_system() {
        let frame = ServerFrame::decode(r#"{"type":"system","text":"ada joined"}"#).unwrap();
        assert_eq!(frame, ServerFrame::System { text: "ada joined".to_string() });
    }

    #[test]
    fn decode_count() {
        let frame = ServerFrame::decode(r#"{"type":"count","value":3}"#).unwrap();
        assert_eq!(frame, ServerFrame::Count { value: 3 });
    }

    #[test]
    fn decode_file() {
        let json = ClientFrame::File(announcement()).encode();
        let frame = ServerFrame::decode(&json).unwrap();
        assert_eq!(frame, ServerFrame::File(announcement()));
    }

    #[test]
    fn decode_grant() {
        let frame = ServerFrame::decode(
            r#"{"presignUrl":"https://blobs.example/put/1","fileUrl":"https://blobs.example/f/1"}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            ServerFrame::Grant(UploadGrant {
                presign_url: "https://blobs.example/put/1".to_string(),
                file_url: "https://blobs.example/f/1".to_string(),
            })
        );
    }

    #[test]
    fn decode_bare_message() {
        let frame =
            ServerFrame::decode(r#"{"ciphertext":"Y2lwaGVy","iv":"bm9uY2Vub25jZQ=="}"#).unwrap();
        assert_eq!(frame, ServerFrame::Message(envelope()));
    }

    #[test]
    fn decode_rejects_unknown_type_tag() {
        let result = ServerFrame::decode(r#"{"type":"upgrade","text":"now"}"#);
        assert!(matches!(result, Err(ProtocolError::UnrecognizedFrame { .. })));
    }

    #[test]
    fn decode_rejects_inbound_presign() {
        // presign flows client-to-relay only
        let result = ServerFrame::decode(r#"{"type":"presign","name":"notes.pdf"}"#);
        assert!(matches!(result, Err(ProtocolError::UnrecognizedFrame { .. })));
    }

    #[test]
    fn decode_rejects_envelope_with_extra_fields() {
        let result =
            ServerFrame::decode(r#"{"ciphertext":"Y2lwaGVy","iv":"bm9uY2Vub25jZQ==","hop":1}"#);
        assert!(matches!(result, Err(ProtocolError::UnrecognizedFrame { .. })));
    }

    #[test]
    fn decode_rejects_non_numeric_count() {
        let result = ServerFrame::decode(r#"{"type":"count","value":"3"}"#);
        assert!(matches!(result, Err(ProtocolError::UnrecognizedFrame { .. })));
    }

    #[test]
    fn decode_rejects_empty_object() {
        assert!(ServerFrame::decode("{}").is_err());
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(ServerFrame::decode("not json at all").is_err());
    }

    #[test]
    fn decode_error_preview_is_truncated() {
        let long = format!("{{\"type\":\"zzz\",\"pad\":\"{}\"}}", "x".repeat(500));
        let Err(ProtocolError::UnrecognizedFrame { preview }) = ServerFrame::decode(&long) else {
            unreachable!("long junk frame must be rejected");
        };
        assert!(preview.len() <= PREVIEW_LEN + 3);
    }
}

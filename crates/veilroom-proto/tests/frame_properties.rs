//! Property-based tests for relay frame encoding/decoding.
//!
//! Verifies that the shapes shared by both directions round-trip for ALL
//! inputs and that decode never panics on junk, only errors.

use proptest::prelude::*;
use veilroom_proto::{ClientFrame, FileAnnouncement, ServerFrame, WireEnvelope};

/// Strategy for base64-looking field text (content is opaque at this layer).
fn arbitrary_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+/]{0,64}(=|==)?"
}

/// Strategy for arbitrary envelopes.
fn arbitrary_envelope() -> impl Strategy<Value = WireEnvelope> {
    (arbitrary_field(), arbitrary_field())
        .prop_map(|(ciphertext, iv)| WireEnvelope { ciphertext, iv })
}

/// Strategy for arbitrary file announcements.
fn arbitrary_announcement() -> impl Strategy<Value = FileAnnouncement> {
    ("[a-z]{1,16}", "[a-zA-Z0-9._ -]{1,32}", arbitrary_field(), arbitrary_envelope(), "[ -~]{1,64}")
        .prop_map(|(sender, name, iv, key, url)| FileAnnouncement { sender, name, iv, key, url })
}

#[test]
fn prop_message_round_trip() {
    proptest!(|(envelope in arbitrary_envelope())| {
        let json = ClientFrame::Message(envelope.clone()).encode();
        let decoded = ServerFrame::decode(&json).expect("message frames must decode");

        prop_assert_eq!(decoded, ServerFrame::Message(envelope));
    });
}

#[test]
fn prop_rotate_round_trip() {
    proptest!(|(envelope in arbitrary_envelope())| {
        let json = ClientFrame::Rotate(envelope.clone()).encode();
        let decoded = ServerFrame::decode(&json).expect("rotate frames must decode");

        prop_assert_eq!(decoded, ServerFrame::Rotate(envelope));
    });
}

#[test]
fn prop_file_round_trip() {
    proptest!(|(announcement in arbitrary_announcement())| {
        let json = ClientFrame::File(announcement.clone()).encode();
        let decoded = ServerFrame::decode(&json).expect("file frames must decode");

        prop_assert_eq!(decoded, ServerFrame::File(announcement));
    });
}

#[test]
fn prop_presign_never_decodes_as_inbound() {
    proptest!(|(name in "[a-zA-Z0-9._ -]{1,32}")| {
        // presign is client-to-relay only; the decoder must reject it
        let json = ClientFrame::Presign { name }.encode();
        prop_assert!(ServerFrame::decode(&json).is_err());
    });
}

#[test]
fn prop_decode_junk_errors_without_panic() {
    proptest!(|(junk in "[ -~]{0,256}")| {
        // PROPERTY: arbitrary printable junk either decodes to a known
        // shape or errors; it never panics
        let _ = ServerFrame::decode(&junk);
    });
}

#[test]
fn prop_decode_arbitrary_json_objects() {
    proptest!(|(
        keys in proptest::collection::vec("[a-z]{1,10}", 0..6),
        values in proptest::collection::vec("[a-z0-9]{0,10}", 0..6),
    )| {
        let pairs: Vec<String> = keys
            .iter()
            .zip(values.iter())
            .map(|(k, v)| format!("\"{k}\":\"{v}\""))
            .collect();
        let json = format!("{{{}}}", pairs.join(","));

        // Must not panic; random objects overwhelmingly fail to match
        let _ = ServerFrame::decode(&json);
    });
}

//! Fuzz target for relay frame decoding
//!
//! Feeds arbitrary bytes through the strict frame decoder.
//!
//! # Invariants
//!
//! - Decode never panics; it classifies or errors
//! - Shapes shared with the outbound direction re-encode and decode back
//!   to the same frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use veilroom_proto::{ClientFrame, ServerFrame};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(frame) = ServerFrame::decode(text) else {
        return;
    };

    let echo = match &frame {
        ServerFrame::Rotate(envelope) => Some(ClientFrame::Rotate(envelope.clone())),
        ServerFrame::Message(envelope) => Some(ClientFrame::Message(envelope.clone())),
        ServerFrame::File(announcement) => Some(ClientFrame::File(announcement.clone())),
        _ => None,
    };

    if let Some(outbound) = echo {
        let decoded =
            ServerFrame::decode(&outbound.encode()).expect("re-encoded frame must decode");
        assert_eq!(decoded, frame);
    }
});

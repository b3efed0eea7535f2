//! Fuzz target for the session state machine
//!
//! Drives a session with arbitrary event sequences, including malformed
//! envelopes and out-of-order file-transfer completions.
//!
//! # Invariants
//!
//! - `handle` never panics; bad inputs produce errors, not aborts
//! - At most one file transfer is in flight at any point
//! - An error leaves the session usable for subsequent events

#![no_main]

use std::sync::{Arc, Mutex};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use veilroom_client::{Environment, RoomIdentity, Session, SessionEvent};
use veilroom_crypto::codec;
use veilroom_proto::{FileAnnouncement, ServerFrame, UploadGrant, WireEnvelope};

/// Deterministic LCG environment; fuzzing needs repeatability, not secrecy.
#[derive(Clone)]
struct FuzzEnv {
    state: Arc<Mutex<u64>>,
}

impl Environment for FuzzEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        let mut state = self.state.lock().unwrap();
        for byte in buffer {
            *state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            *byte = (*state >> 56) as u8;
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Connect,
    Disconnect,
    SendMessage { text: String },
    SendFile { name: String, bytes: Vec<u8> },
    BlobUploaded,
    UploadFailed { reason: String },
    Grant { presign_url: String, file_url: String },
    RotateFrame { ciphertext: Vec<u8>, iv: Vec<u8> },
    MessageFrame { ciphertext: Vec<u8>, iv: Vec<u8> },
    RawMessageFrame { ciphertext: String, iv: String },
    System { text: String },
    Count { value: u32 },
    Announcement { sender: String, name: String, iv: Vec<u8>, url: String },
}

fn envelope(ciphertext: &[u8], iv: &[u8]) -> WireEnvelope {
    WireEnvelope { ciphertext: codec::encode(ciphertext), iv: codec::encode(iv) }
}

fuzz_target!(|ops: Vec<Op>| {
    let env = FuzzEnv { state: Arc::new(Mutex::new(0x9E37_79B9_7F4A_7C15)) };
    let mut session = Session::create(
        env,
        RoomIdentity { room_code: "fuzzroom".to_string(), alias: "fuzzer".to_string() },
    );

    for op in ops {
        let event = match op {
            Op::Connect => SessionEvent::Connected,
            Op::Disconnect => SessionEvent::Disconnected,
            Op::SendMessage { text } => SessionEvent::SendMessage { text },
            Op::SendFile { name, bytes } => SessionEvent::SendFile { name, bytes },
            Op::BlobUploaded => SessionEvent::BlobUploaded,
            Op::UploadFailed { reason } => SessionEvent::UploadFailed { reason },
            Op::Grant { presign_url, file_url } => SessionEvent::FrameReceived(
                ServerFrame::Grant(UploadGrant { presign_url, file_url }),
            ),
            Op::RotateFrame { ciphertext, iv } => {
                SessionEvent::FrameReceived(ServerFrame::Rotate(envelope(&ciphertext, &iv)))
            }
            Op::MessageFrame { ciphertext, iv } => {
                SessionEvent::FrameReceived(ServerFrame::Message(envelope(&ciphertext, &iv)))
            }
            Op::RawMessageFrame { ciphertext, iv } => {
                SessionEvent::FrameReceived(ServerFrame::Message(WireEnvelope { ciphertext, iv }))
            }
            Op::System { text } => SessionEvent::FrameReceived(ServerFrame::System { text }),
            Op::Count { value } => SessionEvent::FrameReceived(ServerFrame::Count { value }),
            Op::Announcement { sender, name, iv, url } => {
                SessionEvent::FrameReceived(ServerFrame::File(FileAnnouncement {
                    sender,
                    name,
                    iv: codec::encode(&iv),
                    key: envelope(b"", b""),
                    url,
                }))
            }
        };

        // Errors are expected under adversarial input; panics are not
        let _ = session.handle(event);
    }
});

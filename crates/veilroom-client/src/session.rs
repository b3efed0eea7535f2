//! Session state machine.
//!
//! The `Session` is the per-room state machine owning the current room key,
//! the sent-message counter that drives rotation, and the single-flight
//! file-transfer state. It receives events ([`SessionEvent`]), processes
//! them through pure state machine logic, and returns actions
//! ([`SessionAction`]) for the caller to execute.
//!
//! All state updates happen atomically within one `handle` call; the
//! caller's sequential dispatch of events preserves arrival order.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use veilroom_crypto::{
    Envelope, NONCE_SIZE, SecretKey, codec, open_rotation, seal_rotation,
    decrypt, decrypt_text, encrypt, encrypt_text,
};
use veilroom_proto::{
    ClientFrame, FileAnnouncement, ProtocolError, ServerFrame, UploadGrant, WireEnvelope,
};

use crate::{
    env::Environment,
    error::SessionError,
    event::{SessionAction, SessionEvent},
};

/// Number of sent messages after which the room key rotates.
///
/// Fixed count, not time-based. Rotation bounds nonce-collision exposure
/// under one key and limits the blast radius of a key compromise; it is not
/// a defense against an attacker already holding the room key.
pub const ROTATION_THRESHOLD: u32 = 20;

/// Who this session is in the room.
///
/// Immutable after session start. The room code routes frames at the relay
/// and carries no secrecy; it appears in the invite URL query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomIdentity {
    /// Relay routing code.
    pub room_code: String,

    /// Self-declared display name.
    pub alias: String,
}

/// Relay connection phases.
///
/// `Disconnected` after a drop is terminal: the session has no reconnect
/// path and send events become no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connection attempt not yet completed.
    Connecting,
    /// Frames flow.
    Connected,
    /// Connection lost; terminal.
    Disconnected,
}

/// Plaintext message payload carried inside an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessagePayload {
    sender: String,
    text: String,
}

/// Single-flight state for an outbound file transfer.
///
/// Exactly one may exist at a time, between the presign request and the
/// announcement broadcast.
struct PendingUpload {
    name: String,
    /// Ciphertext blob awaiting upload.
    blob: Vec<u8>,
    /// Nonce the file bytes were sealed with.
    nonce: [u8; NONCE_SIZE],
    /// The per-file key, sealed under the room key.
    wrapped_key: Envelope,
    phase: UploadPhase,
}

enum UploadPhase {
    /// Presign requested; waiting for the relay's grant.
    SlotRequested,
    /// Grant received; blob handed to the caller for upload.
    Uploading { file_url: String },
}

/// Per-room session state machine.
pub struct Session<E: Environment> {
    env: E,
    identity: RoomIdentity,
    room_key: SecretKey,
    connection: ConnectionState,
    pending_upload: Option<PendingUpload>,
    sent_count: u32,
}

impl<E: Environment> Session<E> {
    /// Start a session for a newly created room with a fresh random key.
    pub fn create(env: E, identity: RoomIdentity) -> Self {
        let room_key = SecretKey::from_bytes(env.random_key());
        Self::with_key(env, identity, room_key)
    }

    /// Start a session joining an existing room with key material from the
    /// invite fragment.
    pub fn join(env: E, identity: RoomIdentity, room_key: SecretKey) -> Self {
        Self::with_key(env, identity, room_key)
    }

    fn with_key(env: E, identity: RoomIdentity, room_key: SecretKey) -> Self {
        Self {
            env,
            identity,
            room_key,
            connection: ConnectionState::Connecting,
            pending_upload: None,
            sent_count: 0,
        }
    }

    /// This session's room identity.
    pub fn identity(&self) -> &RoomIdentity {
        &self.identity
    }

    /// Current connection state.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// The current room key.
    ///
    /// Needed to build the invite link for a created room. Replaced
    /// wholesale on every rotation; callers must not cache it.
    pub fn room_key(&self) -> &SecretKey {
        &self.room_key
    }

    /// Whether a file transfer is currently in flight.
    pub fn transfer_in_flight(&self) -> bool {
        self.pending_upload.is_some()
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// Errors abort the triggering operation only; the session remains
    /// usable. See [`SessionError`] for the taxonomy.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Vec<SessionAction>, SessionError> {
        match event {
            SessionEvent::Connected => {
                self.connection = ConnectionState::Connected;
                Ok(Vec::new())
            },
            SessionEvent::Disconnected => {
                self.connection = ConnectionState::Disconnected;
                Ok(Vec::new())
            },
            SessionEvent::FrameReceived(frame) => self.handle_frame(frame),
            SessionEvent::SendMessage { text } => self.handle_send_message(&text),
            SessionEvent::SendFile { name, bytes } => self.handle_send_file(name, &bytes),
            SessionEvent::BlobUploaded => self.handle_blob_uploaded(),
            SessionEvent::UploadFailed { reason } => self.handle_upload_failed(reason),
            SessionEvent::DownloadFile { record } => {
                Ok(vec![SessionAction::FetchBlob { record }])
            },
            SessionEvent::BlobFetched { record, bytes } => self.handle_blob_fetched(&record, bytes),
        }
    }

    /// Dispatch one inbound frame to its handler.
    fn handle_frame(&mut self, frame: ServerFrame) -> Result<Vec<SessionAction>, SessionError> {
        match frame {
            ServerFrame::Grant(grant) => self.handle_grant(grant),
            ServerFrame::Rotate(wire) => self.handle_rotation(&wire),
            ServerFrame::System { text } => Ok(vec![SessionAction::SystemNotice { text }]),
            ServerFrame::Count { value } => Ok(vec![SessionAction::ParticipantCount { value }]),
            ServerFrame::File(record) => {
                let mine = record.sender == self.identity.alias;
                Ok(vec![SessionAction::DeliverFile { record, mine }])
            },
            ServerFrame::Message(wire) => self.handle_message(&wire),
        }
    }

    fn handle_send_message(&mut self, text: &str) -> Result<Vec<SessionAction>, SessionError> {
        if self.connection != ConnectionState::Connected {
            debug!("dropping send: transport not ready");
            return Ok(Vec::new());
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let payload =
            MessagePayload { sender: self.identity.alias.clone(), text: text.to_string() };
        let Ok(json) = serde_json::to_string(&payload) else {
            unreachable!("message payloads serialize infallibly");
        };

        let envelope = encrypt_text(&self.room_key, &json, self.env.random_nonce());

        let mut actions = vec![
            SessionAction::Send(ClientFrame::Message(to_wire(&envelope))),
            // Optimistic local echo, before any relay acknowledgment
            SessionAction::DeliverMessage {
                sender: self.identity.alias.clone(),
                text: text.to_string(),
                mine: true,
            },
        ];

        self.sent_count += 1;
        if self.sent_count >= ROTATION_THRESHOLD {
            actions.push(self.rotate());
            self.sent_count = 0;
        }

        Ok(actions)
    }

    /// Generate a successor key and announce it to the room.
    ///
    /// The announcement is sealed under the key being retired; the local
    /// swap happens only after it is built, mirroring the
    /// decrypt-then-import order on the receiving side.
    fn rotate(&mut self) -> SessionAction {
        let next = SecretKey::from_bytes(self.env.random_key());
        let announcement = seal_rotation(&self.room_key, &next, self.env.random_nonce());
        self.room_key = next;

        debug!("room key rotated after {ROTATION_THRESHOLD} sent messages");
        SessionAction::Send(ClientFrame::Rotate(to_wire(&announcement)))
    }

    fn handle_rotation(&mut self, wire: &WireEnvelope) -> Result<Vec<SessionAction>, SessionError> {
        let announcement = from_wire(wire)?;
        self.room_key = open_rotation(&self.room_key, &announcement)?;

        debug!("applied room key rotation");
        Ok(Vec::new())
    }

    fn handle_message(&mut self, wire: &WireEnvelope) -> Result<Vec<SessionAction>, SessionError> {
        let envelope = from_wire(wire)?;
        let json = decrypt_text(&self.room_key, &envelope)
            .map_err(|source| SessionError::Authentication { context: "message", source })?;

        let payload: MessagePayload = serde_json::from_str(&json)
            .map_err(|e| SessionError::Payload { reason: e.to_string() })?;

        Ok(vec![SessionAction::DeliverMessage {
            sender: payload.sender,
            text: payload.text,
            mine: false,
        }])
    }

    fn handle_send_file(
        &mut self,
        name: String,
        bytes: &[u8],
    ) -> Result<Vec<SessionAction>, SessionError> {
        if self.connection != ConnectionState::Connected {
            debug!("dropping file send: transport not ready");
            return Ok(Vec::new());
        }
        if self.pending_upload.is_some() {
            return Err(SessionError::TransferInFlight);
        }

        // Per-file key independent of the room key: a leaked blob alone
        // discloses nothing, and losing one per-file key never exposes
        // other files or text.
        let file_key = SecretKey::from_bytes(self.env.random_key());
        let sealed = encrypt(&file_key, bytes, self.env.random_nonce());
        let wrapped_key =
            encrypt_text(&self.room_key, &file_key.encoded(), self.env.random_nonce());

        self.pending_upload = Some(PendingUpload {
            name: name.clone(),
            blob: sealed.ciphertext,
            nonce: sealed.nonce,
            wrapped_key,
            phase: UploadPhase::SlotRequested,
        });

        Ok(vec![SessionAction::Send(ClientFrame::Presign { name })])
    }

    fn handle_grant(&mut self, grant: UploadGrant) -> Result<Vec<SessionAction>, SessionError> {
        let Some(pending) = self.pending_upload.as_mut() else {
            warn!("ignoring upload grant with no transfer in flight");
            return Ok(Vec::new());
        };

        match pending.phase {
            UploadPhase::SlotRequested => {
                pending.phase = UploadPhase::Uploading { file_url: grant.file_url };
                Ok(vec![SessionAction::UploadBlob {
                    presign_url: grant.presign_url,
                    body: pending.blob.clone(),
                }])
            },
            UploadPhase::Uploading { .. } => {
                warn!("ignoring duplicate upload grant");
                Ok(Vec::new())
            },
        }
    }

    fn handle_blob_uploaded(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        let Some(pending) = self.pending_upload.take() else {
            warn!("ignoring upload completion with no transfer in flight");
            return Ok(Vec::new());
        };

        match pending.phase {
            UploadPhase::SlotRequested => {
                warn!("ignoring upload completion before any grant");
                self.pending_upload = Some(pending);
                Ok(Vec::new())
            },
            UploadPhase::Uploading { ref file_url } => {
                let record = FileAnnouncement {
                    sender: self.identity.alias.clone(),
                    name: pending.name.clone(),
                    iv: codec::encode(&pending.nonce),
                    key: to_wire(&pending.wrapped_key),
                    url: file_url.clone(),
                };

                Ok(vec![
                    SessionAction::Send(ClientFrame::File(record.clone())),
                    SessionAction::DeliverFile { record, mine: true },
                ])
            },
        }
    }

    fn handle_upload_failed(&mut self, reason: String) -> Result<Vec<SessionAction>, SessionError> {
        if self.pending_upload.take().is_none() {
            warn!("ignoring upload failure with no transfer in flight");
            return Ok(Vec::new());
        }
        Err(SessionError::Upload { reason })
    }

    fn handle_blob_fetched(
        &mut self,
        record: &FileAnnouncement,
        bytes: Vec<u8>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        let wrapped = from_wire(&record.key)?;
        let encoded_key = decrypt_text(&self.room_key, &wrapped)
            .map_err(|source| SessionError::Authentication { context: "file key", source })?;
        let file_key = SecretKey::from_encoded(&encoded_key)?;

        let envelope = Envelope { ciphertext: bytes, nonce: decode_nonce(&record.iv)? };
        let plaintext = decrypt(&file_key, &envelope)
            .map_err(|source| SessionError::Authentication { context: "file contents", source })?;

        Ok(vec![SessionAction::SaveFile { name: record.name.clone(), bytes: plaintext }])
    }
}

/// Render a crypto envelope into its wire form.
fn to_wire(envelope: &Envelope) -> WireEnvelope {
    WireEnvelope {
        ciphertext: codec::encode(&envelope.ciphertext),
        iv: codec::encode(&envelope.nonce),
    }
}

/// Parse a wire envelope back into its crypto form.
fn from_wire(wire: &WireEnvelope) -> Result<Envelope, SessionError> {
    Ok(Envelope { ciphertext: codec::decode(&wire.ciphertext)?, nonce: decode_nonce(&wire.iv)? })
}

fn decode_nonce(text: &str) -> Result<[u8; NONCE_SIZE], SessionError> {
    let bytes = codec::decode(text)?;
    <[u8; NONCE_SIZE]>::try_from(bytes.as_slice()).map_err(|_| {
        SessionError::Protocol(ProtocolError::InvalidField {
            field: "iv",
            reason: format!("expected {NONCE_SIZE} bytes, got {}", bytes.len()),
        })
    })
}

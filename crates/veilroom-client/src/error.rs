//! Session error taxonomy.

use thiserror::Error;
use veilroom_crypto::{CodecError, RotationError, SealError};
use veilroom_proto::ProtocolError;

/// Errors surfaced by [`Session::handle`](crate::Session::handle).
///
/// None of these are fatal to the session: the operation that produced the
/// error is aborted, the caller surfaces it to the user, and the session
/// stays usable. Only transport loss ends a session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Inbound frame violated the wire protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An envelope failed authentication: wrong key, tampering, or a key
    /// desync after a missed rotation.
    #[error("undecryptable {context}: {source}")]
    Authentication {
        /// What was being decrypted.
        context: &'static str,
        /// Underlying seal failure.
        source: SealError,
    },

    /// A rotation announcement could not be applied.
    #[error(transparent)]
    Rotation(#[from] RotationError),

    /// A base64 field in a frame failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A decrypted message was not the expected JSON payload.
    #[error("malformed message payload: {reason}")]
    Payload {
        /// Parser diagnostic.
        reason: String,
    },

    /// A file transfer is already in flight; the new one was rejected.
    #[error("a file transfer is already in flight")]
    TransferInFlight,

    /// The blob upload failed; the pending transfer was abandoned.
    #[error("file upload failed: {reason}")]
    Upload {
        /// Transport diagnostic.
        reason: String,
    },
}

/// Errors from parsing an invite URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InviteError {
    /// The URL query carries no `room=` parameter.
    #[error("invite URL has no room code")]
    MissingRoomCode,

    /// The URL has no key fragment after `#`.
    #[error("invite URL has no key fragment")]
    MissingKey,

    /// The key fragment is not a valid key export.
    #[error("invite key is malformed: {reason}")]
    MalformedKey {
        /// What was wrong with the fragment.
        reason: String,
    },
}

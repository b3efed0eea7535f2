//! Error types for Veilroom cryptographic operations.

use thiserror::Error;

/// Errors from the binary↔text codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input is not valid standard-alphabet base64.
    #[error("malformed base64 input: {reason}")]
    MalformedInput {
        /// Decoder diagnostic.
        reason: String,
    },

    /// Decoded bytes have the wrong length for the expected value.
    #[error("decoded {actual} bytes, expected {expected}")]
    WrongLength {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes decoded.
        actual: usize,
    },
}

/// Errors from authenticated encryption.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SealError {
    /// Tag verification failed: wrong key, wrong nonce, or a tampered
    /// ciphertext. Also the symptom of a key desync after a missed rotation.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Decrypted bytes are not valid UTF-8 (text wrappers only).
    #[error("decrypted payload is not valid UTF-8")]
    NotUtf8,
}

/// Errors from applying a rotation announcement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RotationError {
    /// The announcement does not authenticate under the held key. A peer
    /// that missed an earlier rotation lands here with no recovery path.
    #[error("rotation announcement is undecryptable under the current key")]
    Undecryptable,

    /// The announcement decrypted but does not carry a valid key export.
    #[error("rotation announcement carries a malformed key: {reason}")]
    MalformedKey {
        /// What was wrong with the key export.
        reason: String,
    },
}

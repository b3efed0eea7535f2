//! Authenticated encryption using ChaCha20-Poly1305.
//!
//! All functions are pure - the nonce must be provided by the caller. This
//! keeps randomness sourcing in the session's environment and enables
//! deterministic testing.

use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};

use crate::{error::SealError, key::SecretKey};

/// Nonce size for the IETF ChaCha20-Poly1305 construction (12 bytes).
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag size (16 bytes).
const TAG_SIZE: usize = 16;

/// Ciphertext plus the nonce it was sealed with.
///
/// One envelope per encryption call. A nonce must never repeat under the
/// same key; rotation caps how many envelopes one key produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Ciphertext including the 16-byte Poly1305 tag.
    pub ciphertext: Vec<u8>,

    /// The 12-byte nonce this envelope was sealed with.
    pub nonce: [u8; NONCE_SIZE],
}

impl Envelope {
    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }
}

/// Seal plaintext under `key` with a caller-provided nonce.
///
/// # Security
///
/// - Caller MUST provide a fresh cryptographically random nonce per call
/// - Authenticated encryption prevents tampering
pub fn encrypt(key: &SecretKey, plaintext: &[u8], nonce: [u8; NONCE_SIZE]) -> Envelope {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let Ok(ciphertext) = cipher.encrypt(Nonce::from_slice(&nonce), plaintext) else {
        unreachable!("ChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    Envelope { ciphertext, nonce }
}

/// Open an envelope under `key`.
///
/// # Errors
///
/// - `SealError::AuthenticationFailed` if the tag does not verify (wrong
///   key, wrong nonce, or tampering). Never returns altered plaintext.
pub fn decrypt(key: &SecretKey, envelope: &Envelope) -> Result<Vec<u8>, SealError> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice())
        .map_err(|_| SealError::AuthenticationFailed)
}

/// Seal a UTF-8 string.
pub fn encrypt_text(key: &SecretKey, text: &str, nonce: [u8; NONCE_SIZE]) -> Envelope {
    encrypt(key, text.as_bytes(), nonce)
}

/// Open an envelope expected to contain UTF-8 text.
///
/// # Errors
///
/// - `SealError::AuthenticationFailed` on tag failure
/// - `SealError::NotUtf8` if the plaintext is not valid UTF-8
pub fn decrypt_text(key: &SecretKey, envelope: &Envelope) -> Result<String, SealError> {
    String::from_utf8(decrypt(key, envelope)?).map_err(|_| SealError::NotUtf8)
}

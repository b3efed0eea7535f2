//! Symmetric key handle.

use std::fmt;

use zeroize::Zeroize;

use crate::{codec, error::CodecError};

/// Size of a symmetric key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// An exportable 256-bit symmetric AEAD key.
///
/// The same type serves as the shared room key and as the one-shot per-file
/// key; both are random 32-byte values with no derivation schedule. The key
/// material is zeroized on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    bytes: [u8; KEY_SIZE],
}

impl SecretKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Import a key from its base64 export (invite fragments, rotation
    /// announcements, wrapped file keys).
    ///
    /// # Errors
    ///
    /// - `CodecError::MalformedInput` if the text is not base64
    /// - `CodecError::WrongLength` if it does not decode to 32 bytes
    pub fn from_encoded(text: &str) -> Result<Self, CodecError> {
        let mut decoded = codec::decode(text)?;
        let Ok(bytes) = <[u8; KEY_SIZE]>::try_from(decoded.as_slice()) else {
            let actual = decoded.len();
            decoded.zeroize();
            return Err(CodecError::WrongLength { expected: KEY_SIZE, actual });
        };
        decoded.zeroize();
        Ok(Self { bytes })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Export the key as base64 text.
    pub fn encoded(&self) -> String {
        codec::encode(&self.bytes)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

// Key material must never reach logs or error messages.
impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

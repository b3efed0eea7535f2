//! Binary ↔ text codec.
//!
//! Standard-alphabet base64. The encoded form is safe to embed in JSON
//! strings and in URL fragments, which is everywhere the protocol puts it:
//! envelope fields, wrapped file keys, and the invite-link key fragment.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::CodecError;

/// Encode raw bytes as base64 text.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 text back into raw bytes.
///
/// # Errors
///
/// - `CodecError::MalformedInput` if the text is not valid base64
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD.decode(text).map_err(|e| CodecError::MalformedInput { reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn encode_known_vector() {
        assert_eq!(encode(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn decode_known_vector() {
        assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn empty_round_trip() {
        assert_eq!(decode(&encode(b"")).unwrap(), b"");
    }

    #[test]
    fn rejects_malformed_input() {
        let result = decode("not base64!!!");
        assert!(matches!(result, Err(CodecError::MalformedInput { .. })));
    }

    #[test]
    fn rejects_truncated_input() {
        // Single dangling character cannot be valid base64
        let result = decode("A");
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
            let encoded = encode(&bytes);
            prop_assert_eq!(decode(&encoded).unwrap(), bytes);
        }

        #[test]
        fn encoded_text_is_ascii(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert!(encode(&bytes).is_ascii());
        }
    }
}

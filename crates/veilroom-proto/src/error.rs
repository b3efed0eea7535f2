//! Wire protocol errors.

use thiserror::Error;

/// Errors from frame encoding and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Inbound text matched none of the known relay frame shapes.
    #[error("unrecognized frame shape: {preview}")]
    UnrecognizedFrame {
        /// Truncated copy of the offending frame text.
        preview: String,
    },

    /// A frame field held a value the protocol does not allow.
    #[error("invalid frame field `{field}`: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

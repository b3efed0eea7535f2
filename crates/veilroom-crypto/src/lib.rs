//! Veilroom Cryptographic Primitives
//!
//! Cryptographic building blocks for Veilroom. Pure functions with
//! deterministic outputs. Callers provide random bytes for deterministic
//! testing.
//!
//! # Key Lifecycle
//!
//! A room has exactly one current key at any time. It is created fresh when a
//! room is opened, or imported from the invite-URL fragment when joining, and
//! replaced wholesale by rotation announcements.
//!
//! ```text
//! Invite fragment ──import──▶ Room Key ──rotate──▶ Room Key'
//!                                │
//!                                ▼
//!                      AEAD Envelope per message
//!
//! Per-file key ──AEAD──▶ file ciphertext
//!       │
//!       └──sealed under Room Key──▶ wrapped key in the file announcement
//! ```
//!
//! A rotation seals the successor key under the key being retired, so peers
//! decrypt-then-import with the key they already hold. The sender swaps only
//! after the announcement is built.
//!
//! # Security
//!
//! - Every envelope carries a fresh random 12-byte nonce; nonce uniqueness
//!   under one key is the caller's responsibility and the reason rotation
//!   bounds how many messages a single key encrypts.
//! - Authentication tag failure rejects the envelope. Decryption never
//!   returns unauthenticated plaintext.
//! - Key material is zeroized on drop and redacted from `Debug` output.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod error;
pub mod key;
pub mod rotation;
pub mod seal;

pub use error::{CodecError, RotationError, SealError};
pub use key::{KEY_SIZE, SecretKey};
pub use rotation::{open_rotation, seal_rotation};
pub use seal::{Envelope, NONCE_SIZE, decrypt, decrypt_text, encrypt, encrypt_text};

//! Environment abstraction for deterministic testing.
//!
//! Decouples session logic from system randomness. Tests drive sessions
//! with a seeded RNG; production uses the OS RNG.
//!
//! This protocol consumes no clock: rotation is message-count based and no
//! operation carries a timeout, so the environment provides randomness only.

use veilroom_crypto::{KEY_SIZE, NONCE_SIZE};

/// Abstract environment providing cryptographic randomness.
///
/// # Safety
///
/// Implementations MUST use cryptographically secure entropy in production.
/// Nonce uniqueness under a reused room key rests entirely on this.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Fresh 32-byte key material.
    fn random_key(&self) -> [u8; KEY_SIZE] {
        let mut bytes = [0u8; KEY_SIZE];
        self.random_bytes(&mut bytes);
        bytes
    }

    /// Fresh 12-byte AEAD nonce.
    fn random_nonce(&self) -> [u8; NONCE_SIZE] {
        let mut bytes = [0u8; NONCE_SIZE];
        self.random_bytes(&mut bytes);
        bytes
    }

    /// Generates a random `u64`.
    ///
    /// Convenience for non-secret identifiers such as room codes.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}

/// Production environment backed by the OS RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails. This is intentional - a session without
/// functioning cryptographic randomness cannot operate securely, and RNG
/// failure indicates OS-level trouble.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - the session cannot operate securely");
    }
}

//! Room key rotation announcements.
//!
//! A rotation replaces the room key wholesale. The successor key is
//! exported, sealed as text under the key being retired, and broadcast;
//! receivers open the announcement with the key they hold and import the
//! result. The sender must build the announcement before swapping locally,
//! and receivers decrypt-then-import in the same order.

use crate::{
    error::RotationError,
    key::SecretKey,
    seal::{self, Envelope, NONCE_SIZE},
};

/// Seal a rotation announcement carrying `next` under `current`.
///
/// The successor key travels as its base64 export sealed as text, so the
/// announcement embeds directly in a JSON frame.
pub fn seal_rotation(current: &SecretKey, next: &SecretKey, nonce: [u8; NONCE_SIZE]) -> Envelope {
    seal::encrypt_text(current, &next.encoded(), nonce)
}

/// Open a rotation announcement with the currently held key and import the
/// successor.
///
/// # Errors
///
/// - `RotationError::Undecryptable` if the envelope does not authenticate
///   under `current` - the unrecoverable state of a peer that missed an
///   earlier rotation
/// - `RotationError::MalformedKey` if the announcement decrypts but does
///   not carry a valid 32-byte key export
pub fn open_rotation(
    current: &SecretKey,
    announcement: &Envelope,
) -> Result<SecretKey, RotationError> {
    let encoded = seal::decrypt_text(current, announcement)
        .map_err(|_| RotationError::Undecryptable)?;

    SecretKey::from_encoded(&encoded)
        .map_err(|e| RotationError::MalformedKey { reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::SealError, key::KEY_SIZE};

    fn key(fill: u8) -> SecretKey {
        SecretKey::from_bytes([fill; KEY_SIZE])
    }

    #[test]
    fn rotation_round_trip() {
        let current = key(1);
        let next = key(2);

        let announcement = seal_rotation(&current, &next, [0x0A; NONCE_SIZE]);
        let imported = open_rotation(&current, &announcement).unwrap();

        assert_eq!(imported.as_bytes(), next.as_bytes());
    }

    #[test]
    fn announcement_opens_under_old_key_only() {
        let current = key(1);
        let next = key(2);

        let announcement = seal_rotation(&current, &next, [0x0A; NONCE_SIZE]);

        // The successor key itself cannot open its own announcement
        let result = open_rotation(&next, &announcement);
        assert_eq!(result, Err(RotationError::Undecryptable));
    }

    #[test]
    fn post_rotation_traffic_fails_under_old_key() {
        let old = key(1);
        let announcement = seal_rotation(&old, &key(2), [0x0A; NONCE_SIZE]);
        let new = open_rotation(&old, &announcement).unwrap();

        let message = seal::encrypt_text(&new, "after rotation", [0x0B; NONCE_SIZE]);

        assert_eq!(seal::decrypt_text(&old, &message), Err(SealError::AuthenticationFailed));
        assert_eq!(seal::decrypt_text(&new, &message).unwrap(), "after rotation");
    }

    #[test]
    fn pre_rotation_traffic_unrecoverable_after_swap() {
        // No backward compatibility: once the old key is discarded, traffic
        // sealed under it stays sealed.
        let old = key(1);
        let message = seal::encrypt_text(&old, "before rotation", [0x0B; NONCE_SIZE]);

        let announcement = seal_rotation(&old, &key(2), [0x0A; NONCE_SIZE]);
        let new = open_rotation(&old, &announcement).unwrap();

        assert_eq!(seal::decrypt_text(&new, &message), Err(SealError::AuthenticationFailed));
    }

    #[test]
    fn tampered_announcement_is_undecryptable() {
        let current = key(1);
        let mut announcement = seal_rotation(&current, &key(2), [0x0A; NONCE_SIZE]);

        announcement.ciphertext[0] ^= 0xFF;

        assert_eq!(open_rotation(&current, &announcement), Err(RotationError::Undecryptable));
    }

    #[test]
    fn desynced_peer_cannot_apply_rotation() {
        // A peer still holding the key from two rotations ago cannot open
        // the latest announcement.
        let k1 = key(1);
        let k2 = key(2);
        let k3 = key(3);

        let second_announcement = seal_rotation(&k2, &k3, [0x0A; NONCE_SIZE]);

        assert_eq!(open_rotation(&k1, &second_announcement), Err(RotationError::Undecryptable));
    }

    #[test]
    fn announcement_with_garbage_payload_is_malformed() {
        let current = key(1);
        // Sealed under the right key, but the payload is not a key export
        let bogus = seal::encrypt_text(&current, "not a key", [0x0A; NONCE_SIZE]);

        let result = open_rotation(&current, &bogus);
        assert!(matches!(result, Err(RotationError::MalformedKey { .. })));
    }

    #[test]
    fn announcement_with_short_key_is_malformed() {
        let current = key(1);
        let short = crate::codec::encode(&[0u8; 16]);
        let bogus = seal::encrypt_text(&current, &short, [0x0A; NONCE_SIZE]);

        let result = open_rotation(&current, &bogus);
        assert!(matches!(result, Err(RotationError::MalformedKey { .. })));
    }
}

//! Invite links.
//!
//! A room is shared as `<origin><path>?room=<code>#<base64 key>`. Browsers
//! never transmit the fragment, so the relay only ever sees the routing
//! query; the key rides along for humans and joining clients alone. That
//! asymmetry is the whole security anchor of out-of-band key distribution.

use veilroom_crypto::SecretKey;

use crate::{env::Environment, error::InviteError};

/// Length of a room code in characters.
pub const ROOM_CODE_LEN: usize = 8;

/// Base36 alphabet for room codes.
const CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Parsed contents of an invite URL.
#[derive(Debug, PartialEq, Eq)]
pub struct RoomInvite {
    /// Relay routing code from the query string.
    pub room_code: String,

    /// Room key imported from the fragment.
    pub key: SecretKey,
}

/// Generate an 8-character base36 room code.
///
/// Routing identifier only; it carries no secrecy, so the slight modulo
/// bias of this mapping is irrelevant.
pub fn generate_room_code(env: &impl Environment) -> String {
    let mut bytes = [0u8; ROOM_CODE_LEN];
    env.random_bytes(&mut bytes);

    bytes.iter().map(|&b| CODE_ALPHABET[b as usize % CODE_ALPHABET.len()] as char).collect()
}

/// Build the shareable join URL for a room.
pub fn invite_url(origin: &str, path: &str, room_code: &str, key: &SecretKey) -> String {
    format!("{origin}{path}?room={room_code}#{}", key.encoded())
}

/// Parse a join URL back into its room code and key.
///
/// # Errors
///
/// - `InviteError::MissingRoomCode` if the query has no `room=` parameter
/// - `InviteError::MissingKey` if there is no fragment
/// - `InviteError::MalformedKey` if the fragment is not a 32-byte key export
pub fn parse_invite(url: &str) -> Result<RoomInvite, InviteError> {
    let (head, fragment) = url.split_once('#').ok_or(InviteError::MissingKey)?;
    if fragment.is_empty() {
        return Err(InviteError::MissingKey);
    }

    let query = head.split_once('?').map(|(_, q)| q).ok_or(InviteError::MissingRoomCode)?;
    let room_code = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("room="))
        .filter(|code| !code.is_empty())
        .ok_or(InviteError::MissingRoomCode)?;

    let key = SecretKey::from_encoded(fragment)
        .map_err(|e| InviteError::MalformedKey { reason: e.to_string() })?;

    Ok(RoomInvite { room_code: room_code.to_string(), key })
}

//! Random opaque tokens.
//!
//! All randomness comes from the OS RNG. Pairing codes are short and
//! human-typable; registration ids and session tokens are 256-bit.

use vault_types::PAIRING_CODE_LEN;

/// Alphabet for pairing and login codes.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a pairing code: uppercase alphanumeric, fixed length.
///
/// The code space is small; callers must check-and-retry against live
/// codes for uniqueness.
pub fn pairing_code() -> String {
    let mut code = String::with_capacity(PAIRING_CODE_LEN);
    for _ in 0..PAIRING_CODE_LEN {
        let idx = rand::Rng::gen_range(&mut rand::rngs::OsRng, 0..CODE_ALPHABET.len());
        code.push(CODE_ALPHABET[idx] as char);
    }
    code
}

/// Generate a registration id: 32 random bytes, base64url without padding.
pub fn reg_id() -> String {
    urlsafe_token()
}

/// Generate a session token: 32 random bytes, base64url without padding.
pub fn session_token() -> String {
    urlsafe_token()
}

/// Generate an entity id: 16 random bytes, hex.
pub fn entity_id() -> String {
    let mut bytes = [0u8; 16];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
    hex::encode(bytes)
}

fn urlsafe_token() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

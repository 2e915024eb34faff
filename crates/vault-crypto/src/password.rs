//! Argon2id password hashing.
//!
//! Account passwords are stored as PHC strings (`$argon2id$...`), salt
//! included, with the crate's default parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::{CryptoError, Result};

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CryptoError::Argon2(e.to_string()))?;
    Ok(hashed.to_string())
}

/// Verify a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; malformed stored hashes are an error.
pub fn verify(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| CryptoError::Argon2(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CryptoError::Argon2(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let phc = hash("secret1").expect("hash");
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify("secret1", &phc).expect("verify"));
        assert!(!verify("secret2", &phc).expect("verify"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash("same password").expect("hash");
        let b = hash("same password").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(verify("x", "not-a-phc-string").is_err());
    }
}

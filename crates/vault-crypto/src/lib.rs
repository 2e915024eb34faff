//! # vault-crypto
//!
//! Password hashing and opaque token generation for the Vault workspace.
//!
//! - [`password`] - argon2id hashing and verification (PHC string format)
//! - [`token`] - random pairing codes, registration ids, session tokens,
//!   and entity ids

pub mod password;
pub mod token;

/// Error types for crypto operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Hashing or hash parsing failed.
    #[error("argon2 error: {0}")]
    Argon2(String),
}

/// Convenience result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

//! # vault-auth
//!
//! Registration and login built on short-lived pairing codes.
//!
//! This crate implements:
//!
//! - [`pairing`] - the registry of pending registrations, confirmation
//!   codes, and login codes, all with TTLs
//! - [`link`] - deep-link creation and parsing (`https://t.me/...` URLs)
//! - [`flow`] - the registration state machine and the login operations
//!
//! ## Registration Flow
//!
//! 1. The client submits username/password; a pending registration is
//!    stored and a deep link into the messaging bot is returned.
//! 2. The user opens the deep link; the bot reports back the chat id and
//!    the flow offers a confirm affordance.
//! 3. On confirm, the pending registration is consumed and a 6-character
//!    confirmation code is issued to the chat.
//! 4. The user types the code into the client; the code is consumed
//!    exactly once, uniqueness is re-checked, and the account is created
//!    with its welcome bonus.
//!
//! Which map holds an entry is the state: pending registration, then
//! confirmation code, then account.

pub mod flow;
pub mod link;
pub mod pairing;

/// Error types for auth operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Malformed input; the message names the first violated rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Username uniqueness violation (checked case-insensitively).
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// The chat already owns an account; one chat cannot complete two
    /// registrations.
    #[error("chat already linked to an account")]
    ChatAlreadyLinked,

    /// The registration id is unknown or past its TTL.
    #[error("unknown or expired registration")]
    UnknownRegistration,

    /// The code is unknown, already consumed, or past its TTL. Expired
    /// and unknown are deliberately indistinguishable.
    #[error("invalid or expired code")]
    InvalidCode,

    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Gateway-only account with no password set.
    #[error("account has no password")]
    NoPassword,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("crypto error: {0}")]
    Crypto(#[from] vault_crypto::CryptoError),

    #[error(transparent)]
    Ledger(#[from] vault_ledger::LedgerError),

    #[error(transparent)]
    Store(#[from] vault_store::StoreError),
}

/// Convenience result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

//! # vault-types
//!
//! Shared domain types used across the Vault workspace.

pub mod favorite;
pub mod ledger;
pub mod payment;
pub mod product;
pub mod user;

/// Common id aliases. Ids are opaque strings (hex of 16 random bytes).
pub type UserId = String;
pub type ProductId = String;
pub type TransactionId = String;
pub type PaymentId = String;

/// Chat identifier on the messaging platform.
pub type ChatId = i64;

/// Welcome bonus credited to every new account.
pub const STARTING_BONUS: u64 = 5_000;

/// A pending registration lives this long before the deep link goes stale.
pub const REGISTRATION_TTL_SECS: u64 = 15 * 60;

/// A confirmation code lives this long after the bot issues it.
pub const PAIRING_CODE_TTL_SECS: u64 = 10 * 60;

/// A login code lives this long after the bot issues it.
pub const LOGIN_CODE_TTL_SECS: u64 = 5 * 60;

/// Length of pairing and login codes (uppercase alphanumeric).
pub const PAIRING_CODE_LEN: usize = 6;

/// Minimum username length. Usernames are `[A-Za-z0-9_]+`.
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Sessions older than this are treated as stale.
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 3600;

/// Transaction history entries returned per profile query.
pub const TX_HISTORY_LIMIT: usize = 30;

//! # vault-store
//!
//! The in-memory repository backing the marketplace core.
//!
//! Memory is the authority: every read and write goes against the maps
//! held by [`Store`], and the JSON snapshot on disk is a cache flushed
//! periodically by the daemon. A failed flush loses nothing but
//! durability.
//!
//! Accessors are grouped per domain:
//! - [`users`] - account lookup and uniqueness checks
//! - [`products`] - catalog entries
//! - [`ledger`] - append-only transaction log
//! - [`favorites`] - user/product favorite pairs
//! - [`payments`] - external payment records
//! - [`snapshot`] - load/save of the whole store

pub mod favorites;
pub mod ledger;
pub mod payments;
pub mod products;
pub mod snapshot;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vault_types::favorite::Favorite;
use vault_types::ledger::Transaction;
use vault_types::payment::Payment;
use vault_types::product::Product;
use vault_types::user::User;
use vault_types::{PaymentId, ProductId, UserId};

/// Store error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Convenience result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The whole marketplace state. One writer at a time; the daemon
/// serializes access behind a lock.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    transactions: Vec<Transaction>,
    favorites: Vec<Favorite>,
    payments: HashMap<PaymentId, Payment>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

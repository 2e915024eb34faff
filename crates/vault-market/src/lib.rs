//! # vault-market
//!
//! Catalog, favorites, download access, and the purchase handler.
//!
//! - [`catalog`] - publish and filtered/sorted listing
//! - [`purchase`] - the all-or-nothing buy operation
//! - [`favorites`] - toggle and list
//! - [`access`] - who may download a product's file

pub mod access;
pub mod catalog;
pub mod favorites;
pub mod purchase;

/// Error types for marketplace operations.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("product already owned")]
    AlreadyOwned,

    #[error("cannot buy your own product")]
    SelfPurchase,

    #[error("access denied")]
    AccessDenied,

    #[error(transparent)]
    Store(#[from] vault_store::StoreError),

    #[error(transparent)]
    Ledger(#[from] vault_ledger::LedgerError),
}

/// Convenience result type for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketError>;

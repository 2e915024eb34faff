//! Download access checks.
//!
//! The file store itself is an opaque collaborator; this module only
//! decides who may fetch a product's file reference.

use vault_store::Store;

use crate::{MarketError, Result};

/// Resolve the file reference a user may download.
///
/// Buyers and the seller may download; everyone else is denied. A
/// product without a file reads as not found.
pub fn download_ref(store: &Store, user_id: &str, product_id: &str) -> Result<String> {
    let user = store
        .user(user_id)
        .ok_or_else(|| MarketError::NotFound(format!("user {user_id}")))?;
    let product = store
        .product(product_id)
        .ok_or_else(|| MarketError::NotFound(format!("product {product_id}")))?;

    let owns = user.inventory.iter().any(|p| p == product_id);
    if !owns && product.seller_id != user_id {
        return Err(MarketError::AccessDenied);
    }
    product
        .file
        .clone()
        .ok_or_else(|| MarketError::NotFound(format!("file for product {product_id}")))
}

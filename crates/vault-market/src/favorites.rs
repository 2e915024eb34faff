//! Favorite toggling and listing.

use vault_store::Store;
use vault_types::product::Product;

use crate::{MarketError, Result};

/// Toggle a favorite. Returns whether the product is favorited after
/// the call.
pub fn toggle(store: &mut Store, user_id: &str, product_id: &str) -> Result<bool> {
    if store.user(user_id).is_none() {
        return Err(MarketError::NotFound(format!("user {user_id}")));
    }
    if store.remove_favorite(user_id, product_id) {
        Ok(false)
    } else {
        store.push_favorite(user_id, product_id);
        Ok(true)
    }
}

/// A user's favorited products. Unknown users get an empty list, and
/// pairs whose product no longer resolves are skipped.
pub fn list(store: &Store, user_id: &str) -> Vec<Product> {
    store
        .favorite_products(user_id)
        .into_iter()
        .cloned()
        .collect()
}

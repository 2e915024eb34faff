//! User/product favorite pairs.

use vault_types::favorite::Favorite;
use vault_types::product::Product;

use crate::Store;

impl Store {
    pub fn has_favorite(&self, user_id: &str, product_id: &str) -> bool {
        self.favorites
            .iter()
            .any(|f| f.user_id == user_id && f.product_id == product_id)
    }

    pub fn push_favorite(&mut self, user_id: &str, product_id: &str) {
        self.favorites.push(Favorite {
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
        });
    }

    /// Remove one pair. Returns whether anything was removed.
    pub fn remove_favorite(&mut self, user_id: &str, product_id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites
            .retain(|f| !(f.user_id == user_id && f.product_id == product_id));
        self.favorites.len() != before
    }

    /// A user's favorited products. Pairs whose product no longer
    /// resolves are skipped.
    pub fn favorite_products(&self, user_id: &str) -> Vec<&Product> {
        self.favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| self.products.get(&f.product_id))
            .collect()
    }
}

//! Catalog entries.

use vault_types::product::Product;

use crate::{Result, Store, StoreError};

impl Store {
    /// Insert a new product. Fails with [`StoreError::Conflict`] on a
    /// duplicate id.
    pub fn insert_product(&mut self, product: Product) -> Result<()> {
        if self.products.contains_key(&product.id) {
            return Err(StoreError::Conflict(format!("product id {}", product.id)));
        }
        self.products.insert(product.id.clone(), product);
        Ok(())
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.get_mut(id)
    }

    /// All products, unordered. Callers sort.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn products_by_seller(&self, seller_id: &str) -> Vec<&Product> {
        self.products
            .values()
            .filter(|p| p.seller_id == seller_id)
            .collect()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

//! Shared fixtures for store tests.

use vault_types::product::Product;
use vault_types::user::{default_avatar, User, DEFAULT_BIO};

pub(crate) fn test_user(id: &str, username: &str, chat_id: Option<i64>) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        password_hash: None,
        chat_id,
        display_name: username.to_string(),
        bio: DEFAULT_BIO.to_string(),
        avatar_url: default_avatar(username),
        balance: 0,
        earned: 0,
        joined: 1_700_000_000,
        inventory: vec![],
        my_products: vec![],
    }
}

pub(crate) fn test_product(id: &str, seller_id: &str, price: u64) -> Product {
    Product {
        id: id.to_string(),
        title: format!("product {id}"),
        description: String::new(),
        price,
        category: "SCRIPT".to_string(),
        seller_id: seller_id.to_string(),
        file: None,
        downloads: 0,
        created_at: 1_700_000_000,
    }
}

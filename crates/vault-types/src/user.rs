//! User account structures.

use serde::{Deserialize, Serialize};

use crate::{ChatId, ProductId, UserId};

/// A registered account.
///
/// `balance` is the source of truth for funds; the transaction log is an
/// audit trail that must reconcile with it. Accounts are never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique, compared case-insensitively.
    pub username: String,
    /// PHC-format argon2id hash. `None` for gateway-only accounts.
    pub password_hash: Option<String>,
    /// Messaging chat linked to this account. Unique when set.
    pub chat_id: Option<ChatId>,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub balance: u64,
    /// Lifetime sale proceeds.
    pub earned: u64,
    /// Unix seconds at registration.
    pub joined: u64,
    /// Product ids this user has bought.
    pub inventory: Vec<ProductId>,
    /// Product ids this user has published.
    pub my_products: Vec<ProductId>,
}

impl User {
    /// The client-facing view. The password hash never leaves the core.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            username: self.username.clone(),
            chat_linked: self.chat_id.is_some(),
            display_name: self.display_name.clone(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            balance: self.balance,
            earned: self.earned,
            joined: self.joined,
            inventory: self.inventory.clone(),
            my_products: self.my_products.clone(),
        }
    }
}

/// A user as returned to clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub chat_linked: bool,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub balance: u64,
    pub earned: u64,
    pub joined: u64,
    pub inventory: Vec<ProductId>,
    pub my_products: Vec<ProductId>,
}

/// Aggregate profile statistics.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserStats {
    /// Products published.
    pub products: u64,
    /// Units sold across all published products.
    pub sales: u64,
    /// Gross proceeds across all published products.
    pub earned: u64,
    /// Products bought.
    pub purchases: u64,
}

/// Default avatar for a fresh account, seeded by username.
pub fn default_avatar(username: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={username}")
}

/// Default bio for a fresh account.
pub const DEFAULT_BIO: &str = "New member";

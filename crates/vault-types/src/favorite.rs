//! Favorites.

use serde::{Deserialize, Serialize};

use crate::{ProductId, UserId};

/// A user/product favorite pair. Toggling removes on second call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: UserId,
    pub product_id: ProductId,
}

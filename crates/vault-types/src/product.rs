//! Product catalog structures.

use serde::{Deserialize, Serialize};

use crate::{ProductId, UserId};

/// A published product.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Non-negative price in the marketplace currency.
    pub price: u64,
    pub category: String,
    pub seller_id: UserId,
    /// Opaque blob-store reference. `None` for listings without a file.
    pub file: Option<String>,
    /// Incremented once per completed purchase.
    pub downloads: u64,
    pub created_at: u64,
}

/// Fields a seller submits when publishing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: u64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_category() -> String {
    "OTHER".to_string()
}

/// Catalog listing query.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Exact category match; `None` or `"all"` disables the filter.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive substring against title or description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

/// Catalog sort orders. Newest is the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Newest,
    Popular,
    PriceLow,
    PriceHigh,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Newest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_wire_names() {
        let json = serde_json::to_string(&SortOrder::PriceLow).expect("serialize");
        assert_eq!(json, "\"price-low\"");
        let parsed: SortOrder = serde_json::from_str("\"popular\"").expect("parse");
        assert_eq!(parsed, SortOrder::Popular);
    }

    #[test]
    fn test_draft_defaults() {
        let draft: ProductDraft =
            serde_json::from_str(r#"{"title": "Parser kit"}"#).expect("parse");
        assert_eq!(draft.category, "OTHER");
        assert_eq!(draft.price, 0);
        assert!(draft.file.is_none());
    }
}

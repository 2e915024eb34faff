//! Publish and catalog listing.

use vault_store::Store;
use vault_types::product::{Product, ProductDraft, ProductQuery, SortOrder};

use crate::{MarketError, Result};

/// Publish a product for a seller.
pub fn publish(
    store: &mut Store,
    seller_id: &str,
    draft: &ProductDraft,
    now: u64,
) -> Result<Product> {
    if store.user(seller_id).is_none() {
        return Err(MarketError::NotFound(format!("user {seller_id}")));
    }
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(MarketError::Validation("title must not be empty".to_string()));
    }

    let product = Product {
        id: vault_crypto::token::entity_id(),
        title: title.to_string(),
        description: draft.description.clone(),
        price: draft.price,
        category: if draft.category.is_empty() {
            "OTHER".to_string()
        } else {
            draft.category.clone()
        },
        seller_id: seller_id.to_string(),
        file: draft.file.clone(),
        downloads: 0,
        created_at: now,
    };
    store.insert_product(product.clone())?;
    if let Some(seller) = store.user_mut(seller_id) {
        seller.my_products.push(product.id.clone());
    }

    tracing::info!(product_id = %product.id, seller_id, "product published");
    Ok(product)
}

/// Filtered, sorted catalog listing. Pure over the product set; no
/// pagination.
pub fn list(store: &Store, query: &ProductQuery) -> Vec<Product> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all");
    let search = query.search.as_deref().map(str::to_lowercase);

    let mut result: Vec<Product> = store
        .products()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .filter(|p| {
            search.as_deref().map_or(true, |s| {
                p.title.to_lowercase().contains(s) || p.description.to_lowercase().contains(s)
            })
        })
        .cloned()
        .collect();

    match query.sort.unwrap_or_default() {
        SortOrder::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Popular => result.sort_by(|a, b| b.downloads.cmp(&a.downloads)),
        SortOrder::PriceLow => result.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHigh => result.sort_by(|a, b| b.price.cmp(&a.price)),
    }
    result
}

#[cfg(test)]
mod tests {
    use vault_store::Store;
    use vault_types::product::{ProductDraft, ProductQuery, SortOrder};
    use vault_types::user::{default_avatar, User, DEFAULT_BIO};

    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn store_with_seller(id: &str) -> Store {
        let mut store = Store::new();
        store
            .insert_user(User {
                id: id.to_string(),
                username: format!("seller_{id}"),
                password_hash: None,
                chat_id: None,
                display_name: id.to_string(),
                bio: DEFAULT_BIO.to_string(),
                avatar_url: default_avatar(id),
                balance: 0,
                earned: 0,
                joined: NOW,
                inventory: vec![],
                my_products: vec![],
            })
            .expect("insert seller");
        store
    }

    fn draft(title: &str, price: u64, category: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            price,
            category: category.to_string(),
            file: None,
        }
    }

    #[test]
    fn test_publish_links_seller() {
        let mut store = store_with_seller("u1");
        let product = publish(&mut store, "u1", &draft("Bot kit", 100, "BOT"), NOW)
            .expect("publish");
        let seller = store.user("u1").expect("seller");
        assert_eq!(seller.my_products, vec![product.id.clone()]);
        assert_eq!(store.product(&product.id).map(|p| p.downloads), Some(0));
    }

    #[test]
    fn test_publish_rejects_unknown_seller_and_empty_title() {
        let mut store = store_with_seller("u1");
        assert!(matches!(
            publish(&mut store, "ghost", &draft("X", 1, "BOT"), NOW),
            Err(MarketError::NotFound(_))
        ));
        assert!(matches!(
            publish(&mut store, "u1", &draft("   ", 1, "BOT"), NOW),
            Err(MarketError::Validation(_))
        ));
    }

    fn seeded_store() -> Store {
        let mut store = store_with_seller("u1");
        for (title, price, category, downloads, at) in [
            ("Telegram bot", 300, "BOT", 5, NOW + 1),
            ("Web scraper", 100, "SCRIPT", 20, NOW + 2),
            ("Landing page", 500, "WEB", 1, NOW + 3),
        ] {
            let product = publish(&mut store, "u1", &draft(title, price, category), at)
                .expect("publish");
            if let Some(p) = store.product_mut(&product.id) {
                p.downloads = downloads;
            }
        }
        store
    }

    #[test]
    fn test_list_category_filter() {
        let store = seeded_store();
        let all = list(
            &store,
            &ProductQuery {
                category: Some("all".to_string()),
                ..ProductQuery::default()
            },
        );
        assert_eq!(all.len(), 3);

        let bots = list(
            &store,
            &ProductQuery {
                category: Some("BOT".to_string()),
                ..ProductQuery::default()
            },
        );
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].title, "Telegram bot");
    }

    #[test]
    fn test_list_search_matches_title_or_description() {
        let store = seeded_store();
        let hits = list(
            &store,
            &ProductQuery {
                search: Some("SCRAPER".to_string()),
                ..ProductQuery::default()
            },
        );
        assert_eq!(hits.len(), 1);

        let by_desc = list(
            &store,
            &ProductQuery {
                search: Some("page description".to_string()),
                ..ProductQuery::default()
            },
        );
        assert_eq!(by_desc.len(), 1);
        assert_eq!(by_desc[0].title, "Landing page");
    }

    #[test]
    fn test_sort_orders() {
        let store = seeded_store();

        let newest = list(&store, &ProductQuery::default());
        assert!(newest.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let popular = list(
            &store,
            &ProductQuery {
                sort: Some(SortOrder::Popular),
                ..ProductQuery::default()
            },
        );
        assert!(popular.windows(2).all(|w| w[0].downloads >= w[1].downloads));

        let cheap_first = list(
            &store,
            &ProductQuery {
                sort: Some(SortOrder::PriceLow),
                ..ProductQuery::default()
            },
        );
        assert!(cheap_first.windows(2).all(|w| w[0].price <= w[1].price));

        let expensive_first = list(
            &store,
            &ProductQuery {
                sort: Some(SortOrder::PriceHigh),
                ..ProductQuery::default()
            },
        );
        assert!(expensive_first.windows(2).all(|w| w[0].price >= w[1].price));
    }
}

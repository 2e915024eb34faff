//! The purchase handler.
//!
//! All checks run before any mutation, so a failed purchase leaves no
//! trace. The ownership check runs before the funds check: replaying a
//! completed purchase must always read as "already owned", even when
//! the first purchase drained the balance below the price.

use vault_store::Store;
use vault_types::ledger::TxKind;
use vault_types::{ChatId, UserId};

use crate::{MarketError, Result};

/// What a completed purchase changed, plus everything the caller needs
/// for the best-effort seller notification.
#[derive(Clone, Debug)]
pub struct PurchaseOutcome {
    pub product_id: String,
    pub product_title: String,
    pub price: u64,
    pub buyer_balance: u64,
    pub buyer_display_name: String,
    /// `None` when the seller account has vanished; the purchase still
    /// completes.
    pub seller_id: Option<UserId>,
    pub seller_chat_id: Option<ChatId>,
    pub seller_balance: Option<u64>,
}

/// Buy a product: debit the buyer, credit the seller (if still
/// present), bump the download counter, record ownership.
pub fn purchase(
    store: &mut Store,
    buyer_id: &str,
    product_id: &str,
    now: u64,
) -> Result<PurchaseOutcome> {
    let buyer = store
        .user(buyer_id)
        .ok_or_else(|| MarketError::NotFound(format!("user {buyer_id}")))?;
    let product = store
        .product(product_id)
        .ok_or_else(|| MarketError::NotFound(format!("product {product_id}")))?;

    if buyer.inventory.iter().any(|p| p == product_id) {
        return Err(MarketError::AlreadyOwned);
    }
    if product.seller_id == buyer_id {
        return Err(MarketError::SelfPurchase);
    }
    if buyer.balance < product.price {
        return Err(MarketError::InsufficientFunds {
            required: product.price,
            available: buyer.balance,
        });
    }

    let price = product.price;
    let title = product.title.clone();
    let seller_id = product.seller_id.clone();
    let buyer_display_name = buyer.display_name.clone();

    let buyer_balance = vault_ledger::debit(
        store,
        buyer_id,
        price,
        TxKind::Purchase,
        &format!("Purchase: {title}"),
        now,
    )?;

    // The seller may have vanished between publish and purchase; the
    // buyer's side still completes.
    let (seller_chat_id, seller_balance, seller_id) = if store.user(&seller_id).is_some() {
        let balance = vault_ledger::credit(
            store,
            &seller_id,
            price,
            TxKind::Sale,
            &format!("Sale: {title}"),
            now,
        )?;
        let chat_id = store.user(&seller_id).and_then(|u| u.chat_id);
        (chat_id, Some(balance), Some(seller_id))
    } else {
        (None, None, None)
    };

    if let Some(product) = store.product_mut(product_id) {
        product.downloads += 1;
    }
    if let Some(buyer) = store.user_mut(buyer_id) {
        buyer.inventory.push(product_id.to_string());
    }

    tracing::info!(buyer_id, product_id, price, "purchase completed");
    Ok(PurchaseOutcome {
        product_id: product_id.to_string(),
        product_title: title,
        price,
        buyer_balance,
        buyer_display_name,
        seller_id,
        seller_chat_id,
        seller_balance,
    })
}

#[cfg(test)]
mod tests {
    use vault_store::Store;
    use vault_types::ledger::TxKind;
    use vault_types::product::ProductDraft;
    use vault_types::user::{default_avatar, User, DEFAULT_BIO};

    use super::*;
    use crate::catalog;

    const NOW: u64 = 1_700_000_000;

    fn user(id: &str, balance: u64, chat_id: Option<i64>) -> User {
        User {
            id: id.to_string(),
            username: format!("user_{id}"),
            password_hash: None,
            chat_id,
            display_name: format!("User {id}"),
            bio: DEFAULT_BIO.to_string(),
            avatar_url: default_avatar(id),
            balance,
            earned: 0,
            joined: NOW,
            inventory: vec![],
            my_products: vec![],
        }
    }

    fn marketplace(buyer_balance: u64, price: u64) -> (Store, String) {
        let mut store = Store::new();
        store.insert_user(user("seller", 0, Some(777))).expect("seller");
        store.insert_user(user("buyer", buyer_balance, None)).expect("buyer");
        let product = catalog::publish(
            &mut store,
            "seller",
            &ProductDraft {
                title: "Parser kit".to_string(),
                description: String::new(),
                price,
                category: "SCRIPT".to_string(),
                file: None,
            },
            NOW,
        )
        .expect("publish");
        (store, product.id)
    }

    #[test]
    fn test_successful_purchase_moves_money_both_ways() {
        let (mut store, product_id) = marketplace(500, 200);
        let outcome = purchase(&mut store, "buyer", &product_id, NOW + 1).expect("purchase");

        assert_eq!(outcome.buyer_balance, 300);
        assert_eq!(outcome.seller_balance, Some(200));
        assert_eq!(outcome.seller_chat_id, Some(777));
        assert_eq!(store.product(&product_id).map(|p| p.downloads), Some(1));
        assert!(store
            .user("buyer")
            .map(|u| u.inventory.contains(&product_id))
            .unwrap_or(false));

        let kinds: Vec<TxKind> = store.transactions().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TxKind::Purchase, TxKind::Sale]);
        assert_eq!(store.user("seller").map(|u| u.earned), Some(200));
    }

    #[test]
    fn test_insufficient_funds_leaves_no_trace() {
        let (mut store, product_id) = marketplace(100, 150);
        let result = purchase(&mut store, "buyer", &product_id, NOW + 1);

        assert!(matches!(
            result,
            Err(MarketError::InsufficientFunds {
                required: 150,
                available: 100
            })
        ));
        assert_eq!(store.user("buyer").map(|u| u.balance), Some(100));
        assert_eq!(store.product(&product_id).map(|p| p.downloads), Some(0));
        assert!(store.transactions().is_empty());
    }

    #[test]
    fn test_replay_reads_as_already_owned() {
        let (mut store, product_id) = marketplace(500, 400);
        purchase(&mut store, "buyer", &product_id, NOW + 1).expect("first purchase");

        // Balance (100) is now below the price (400); the ownership
        // check must still win.
        let replay = purchase(&mut store, "buyer", &product_id, NOW + 2);
        assert!(matches!(replay, Err(MarketError::AlreadyOwned)));
        assert_eq!(store.user("buyer").map(|u| u.balance), Some(100));
        assert_eq!(store.transactions().len(), 2);
    }

    #[test]
    fn test_self_purchase_rejected() {
        let (mut store, product_id) = marketplace(500, 200);
        let result = purchase(&mut store, "seller", &product_id, NOW + 1);
        assert!(matches!(result, Err(MarketError::SelfPurchase)));
    }

    #[test]
    fn test_missing_buyer_or_product() {
        let (mut store, product_id) = marketplace(500, 200);
        assert!(matches!(
            purchase(&mut store, "ghost", &product_id, NOW),
            Err(MarketError::NotFound(_))
        ));
        assert!(matches!(
            purchase(&mut store, "buyer", "missing", NOW),
            Err(MarketError::NotFound(_))
        ));
    }
}

//! Catalog & purchase command handlers.

use std::sync::Arc;

use serde_json::Value;
use vault_market::{access, catalog, favorites, purchase};
use vault_types::product::{ProductDraft, ProductQuery};

use crate::commands::{market_error, require_user, str_param, CmdResult};
use crate::events::Event;
use crate::rpc::RpcError;
use crate::{time, DaemonState};

/// Public catalog listing.
pub async fn get_products(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let query: ProductQuery = if params.is_null() {
        ProductQuery::default()
    } else {
        serde_json::from_value(params.clone())
            .map_err(|e| RpcError::invalid_params(&e.to_string()))?
    };

    let guard = state.core.lock().await;
    let products = catalog::list(&guard.store, &query);
    Ok(serde_json::json!({"products": products}))
}

/// Publish a product for the session user.
pub async fn publish_product(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let draft: ProductDraft =
        serde_json::from_value(params.get("product").cloned().unwrap_or(Value::Null))
            .map_err(|e| RpcError::invalid_params(&e.to_string()))?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let seller_id = require_user(core, params, now)?;
    let product = catalog::publish(&mut core.store, &seller_id, &draft, now).map_err(market_error)?;
    drop(guard);

    state.event_bus.emit(Event::new(
        "ProductPublished",
        now,
        serde_json::json!({"product_id": product.id, "seller_id": seller_id}),
    ));
    Ok(serde_json::json!({"product": product}))
}

/// Buy a product. The seller notification is best-effort and never
/// blocks or fails the purchase.
pub async fn buy_product(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let product_id = str_param(params, "product_id")?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let buyer_id = require_user(core, params, now)?;
    let outcome =
        purchase::purchase(&mut core.store, &buyer_id, &product_id, now).map_err(market_error)?;
    drop(guard);

    if let Some(chat_id) = outcome.seller_chat_id {
        state.notifier.notify(
            chat_id,
            &format!(
                "Sale! {} bought '{}' for {}. Balance: {}",
                outcome.buyer_display_name,
                outcome.product_title,
                outcome.price,
                outcome.seller_balance.unwrap_or_default()
            ),
        );
    }
    state.event_bus.emit(Event::new(
        "ProductPurchased",
        now,
        serde_json::json!({
            "product_id": outcome.product_id,
            "buyer_id": buyer_id,
            "price": outcome.price,
        }),
    ));
    Ok(serde_json::json!({"balance": outcome.buyer_balance}))
}

/// Toggle a favorite for the session user.
pub async fn toggle_favorite(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let product_id = str_param(params, "product_id")?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let user_id = require_user(core, params, now)?;
    let favorited =
        favorites::toggle(&mut core.store, &user_id, &product_id).map_err(market_error)?;
    Ok(serde_json::json!({"favorited": favorited}))
}

/// The session user's favorites.
pub async fn get_favorites(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let now = time::unix_now();
    let guard = state.core.lock().await;
    let user_id = require_user(&guard, params, now)?;
    let products = favorites::list(&guard.store, &user_id);
    Ok(serde_json::json!({"products": products}))
}

/// Resolve the file reference the session user may download.
pub async fn download_product(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let product_id = str_param(params, "product_id")?;

    let now = time::unix_now();
    let guard = state.core.lock().await;
    let user_id = require_user(&guard, params, now)?;
    let file = access::download_ref(&guard.store, &user_id, &product_id).map_err(market_error)?;
    Ok(serde_json::json!({"file": file}))
}

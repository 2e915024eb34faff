//! Profile command handlers.

use std::sync::Arc;

use serde_json::Value;
use vault_types::user::UserStats;
use vault_types::TX_HISTORY_LIMIT;

use crate::commands::{require_user, str_param, CmdResult};
use crate::rpc::RpcError;
use crate::{time, DaemonState};

/// Public profile aggregate: owned/sold products, favorites, recent
/// transactions, and headline stats.
pub async fn get_user(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let username = str_param(params, "username")?;

    let guard = state.core.lock().await;
    let user = guard
        .store
        .user_by_username(&username)
        .ok_or_else(|| RpcError::not_found(&format!("user {username}")))?;

    let owned: Vec<_> = user
        .inventory
        .iter()
        .filter_map(|id| guard.store.product(id))
        .collect();
    let sold = guard.store.products_by_seller(&user.id);
    let stats = UserStats {
        products: sold.len() as u64,
        sales: sold.iter().map(|p| p.downloads).sum(),
        earned: sold
            .iter()
            .map(|p| p.price.saturating_mul(p.downloads))
            .sum(),
        purchases: owned.len() as u64,
    };
    let favorites = guard.store.favorite_products(&user.id);
    let transactions = guard.store.transactions_for(&user.id, TX_HISTORY_LIMIT);

    Ok(serde_json::json!({
        "user": user.to_public(),
        "owned_products": owned,
        "sold_products": sold,
        "favorites": favorites,
        "transactions": transactions,
        "stats": stats,
    }))
}

/// Update display name and/or bio for the session user.
pub async fn update_profile(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let display_name = params
        .get("display_name")
        .and_then(Value::as_str)
        .map(str::to_string);
    let bio = params.get("bio").and_then(Value::as_str).map(str::to_string);

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let user_id = require_user(core, params, now)?;
    let user = core
        .store
        .user_mut(&user_id)
        .ok_or_else(|| RpcError::not_found(&format!("user {user_id}")))?;

    // An empty display name is ignored; an empty bio clears it.
    if let Some(name) = display_name.filter(|n| !n.trim().is_empty()) {
        user.display_name = name;
    }
    if let Some(bio) = bio {
        user.bio = bio;
    }

    Ok(serde_json::json!({"user": user.to_public()}))
}

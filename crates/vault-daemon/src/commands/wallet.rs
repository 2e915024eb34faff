//! Wallet & payment command handlers.

use std::sync::Arc;

use serde_json::Value;
use vault_pay::Credited;
use vault_types::TX_HISTORY_LIMIT;

use crate::commands::{pay_error, require_user, str_param, u64_param, CmdResult};
use crate::events::Event;
use crate::rpc::RpcError;
use crate::{time, DaemonState};

/// Balance, lifetime earnings, and recent transactions.
pub async fn get_wallet(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let now = time::unix_now();
    let guard = state.core.lock().await;
    let user_id = require_user(&guard, params, now)?;
    let user = guard
        .store
        .user(&user_id)
        .ok_or_else(|| RpcError::not_found(&format!("user {user_id}")))?;

    let transactions = guard.store.transactions_for(&user_id, TX_HISTORY_LIMIT);
    Ok(serde_json::json!({
        "balance": user.balance,
        "earned": user.earned,
        "transactions": transactions,
    }))
}

/// Immediate top-up: a payment created and completed in one step, so
/// the deposit still flows through the ledger.
pub async fn topup(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let amount = params.get("amount").and_then(Value::as_u64).unwrap_or(1000);

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let user_id = require_user(core, params, now)?;
    let payment = vault_pay::create_payment(&mut core.store, &user_id, amount, now)
        .map_err(pay_error)?;
    let credited = vault_pay::payment_completed(&mut core.store, &payment.id, amount, now)
        .map_err(pay_error)?;
    let balance = match credited {
        Credited::Applied { balance } => balance,
        Credited::AlreadyCompleted => core
            .store
            .user(&user_id)
            .map(|u| u.balance)
            .unwrap_or_default(),
    };
    drop(guard);

    state.event_bus.emit(Event::new(
        "PaymentCompleted",
        now,
        serde_json::json!({"payment_id": payment.id, "user_id": user_id, "amount": amount}),
    ));
    Ok(serde_json::json!({"balance": balance}))
}

/// Register a pending payment and hand back the hosted-form URL.
pub async fn create_payment_link(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let amount = u64_param(params, "amount")?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let user_id = require_user(core, params, now)?;
    let payment = vault_pay::create_payment(&mut core.store, &user_id, amount, now)
        .map_err(pay_error)?;
    let url = vault_pay::payment_link(&state.config.payments.receiver, &payment.id, amount);

    Ok(serde_json::json!({
        "payment_id": payment.id,
        "url": url,
        "amount": amount,
    }))
}

/// Payment gateway completion webhook. Idempotent per payment id.
pub async fn payment_webhook(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let payment_id = str_param(params, "payment_id")?;
    let amount = u64_param(params, "amount")?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let credited = vault_pay::payment_completed(&mut core.store, &payment_id, amount, now)
        .map_err(pay_error)?;
    let user_id = core
        .store
        .payment(&payment_id)
        .map(|p| p.user_id.clone())
        .unwrap_or_default();
    drop(guard);

    match credited {
        Credited::Applied { balance } => {
            state.event_bus.emit(Event::new(
                "PaymentCompleted",
                now,
                serde_json::json!({"payment_id": payment_id, "user_id": user_id, "amount": amount}),
            ));
            Ok(serde_json::json!({"credited": true, "balance": balance}))
        }
        Credited::AlreadyCompleted => Ok(serde_json::json!({"credited": false})),
    }
}

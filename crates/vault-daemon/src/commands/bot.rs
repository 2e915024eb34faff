//! Messaging gateway callback handler.
//!
//! The bot transport parses chat commands and deep links into
//! [`BotUpdate`]s and posts them here. Failures on this path are
//! reported back through the chat, not as RPC errors: the web client
//! never sees them.

use std::sync::Arc;

use serde_json::Value;
use vault_auth::{flow, AuthError};
use vault_gateway::BotUpdate;

use crate::rpc::RpcError;
use crate::commands::CmdResult;
use crate::{time, DaemonState};

pub async fn bot_update(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let update: BotUpdate = serde_json::from_value(params.clone())
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;

    match update {
        BotUpdate::DeepLinkOpened {
            reg_id,
            chat_id,
            first_name,
        } => match flow::on_deep_link(&core.store, &core.pairing, &reg_id, chat_id, now) {
            Ok(prompt) => {
                state.notifier.notify(
                    chat_id,
                    &format!(
                        "Hi {first_name}! Confirm to receive the code for account '{}'.",
                        prompt.username
                    ),
                );
                Ok(serde_json::json!({"status": "prompted", "username": prompt.username}))
            }
            Err(AuthError::ChatAlreadyLinked) => {
                state.notifier.notify(
                    chat_id,
                    "This chat is already linked to an account. Use /login for a login code.",
                );
                Ok(serde_json::json!({"status": "already_linked"}))
            }
            Err(_) => {
                state.notifier.notify(
                    chat_id,
                    "This registration link has expired. Start again on the site.",
                );
                Ok(serde_json::json!({"status": "expired"}))
            }
        },

        BotUpdate::ConfirmationRequested {
            reg_id,
            chat_id,
            first_name,
        } => match flow::issue_confirmation_code(
            &core.store,
            &mut core.pairing,
            &reg_id,
            chat_id,
            &first_name,
            now,
        ) {
            Ok(issued) => {
                state.notifier.notify(
                    chat_id,
                    &format!(
                        "Your confirmation code: {}\nEnter it on the site within 10 minutes.",
                        issued.code
                    ),
                );
                Ok(serde_json::json!({"status": "code_issued"}))
            }
            Err(AuthError::ChatAlreadyLinked) => {
                state
                    .notifier
                    .notify(chat_id, "This chat is already linked to an account.");
                Ok(serde_json::json!({"status": "already_linked"}))
            }
            Err(_) => {
                state.notifier.notify(
                    chat_id,
                    "This registration link has expired. Start again on the site.",
                );
                Ok(serde_json::json!({"status": "expired"}))
            }
        },

        BotUpdate::LoginCodeRequested {
            chat_id,
            first_name,
            ..
        } => match flow::request_login_code(&core.store, &mut core.pairing, chat_id, now) {
            Ok(issued) => {
                state.notifier.notify(
                    chat_id,
                    &format!(
                        "Hi {first_name}! Your login code: {}\nValid for 5 minutes.\n{}",
                        issued.code, state.config.gateway.domain
                    ),
                );
                Ok(serde_json::json!({"status": "code_issued"}))
            }
            Err(_) => {
                state.notifier.notify(
                    chat_id,
                    &format!(
                        "You are not registered yet. Start at {}",
                        state.config.gateway.domain
                    ),
                );
                Ok(serde_json::json!({"status": "not_registered"}))
            }
        },

        BotUpdate::BalanceRequested { chat_id } => match core.store.user_by_chat(chat_id) {
            Some(user) => {
                state.notifier.notify(
                    chat_id,
                    &format!(
                        "Balance: {}\nProducts: {}\nPurchases: {}",
                        user.balance,
                        user.my_products.len(),
                        user.inventory.len()
                    ),
                );
                Ok(serde_json::json!({"status": "ok"}))
            }
            None => {
                state
                    .notifier
                    .notify(chat_id, "You are not registered. Use /login after signing up.");
                Ok(serde_json::json!({"status": "not_registered"}))
            }
        },
    }
}

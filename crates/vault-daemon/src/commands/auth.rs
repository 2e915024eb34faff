//! Registration & login command handlers.

use std::sync::Arc;

use serde_json::Value;
use vault_auth::flow::{self, RegistrationRequest};

use crate::commands::{auth_error, str_param, CmdResult};
use crate::events::Event;
use crate::{time, DaemonState};

/// Stage a registration and hand back the deep link for the bot.
pub async fn register_start(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let req = RegistrationRequest {
        username: str_param(params, "username")?.trim().to_string(),
        password: str_param(params, "password")?,
        confirm_password: str_param(params, "confirm_password")?,
    };

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let started =
        flow::start_registration(&core.store, &mut core.pairing, &state.auth_config, &req, now)
            .map_err(auth_error)?;

    Ok(serde_json::json!({
        "reg_id": started.reg_id,
        "deep_link": started.deep_link,
    }))
}

/// Redeem a confirmation code: creates the account and mints a session.
pub async fn auth_confirm_code(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let code = str_param(params, "code")?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let success =
        flow::confirm_registration(&mut core.store, &mut core.pairing, &state.auth_config, &code, now)
            .map_err(auth_error)?;
    let token = core.sessions.issue(&success.user.id, now);

    if let Some(chat_id) = core.store.user(&success.user.id).and_then(|u| u.chat_id) {
        state.notifier.notify(
            chat_id,
            &format!(
                "Account '{}' is ready. Balance: {}",
                success.user.username, success.user.balance
            ),
        );
    }
    drop(guard);

    state.event_bus.emit(Event::new(
        "UserRegistered",
        now,
        serde_json::json!({"user_id": success.user.id, "username": success.user.username}),
    ));
    Ok(serde_json::json!({"user": success.user, "token": token}))
}

/// Password login.
pub async fn auth_login(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let username = str_param(params, "username")?;
    let password = str_param(params, "password")?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let success = flow::login(&core.store, username.trim(), &password).map_err(auth_error)?;
    let token = core.sessions.issue(&success.user.id, now);

    Ok(serde_json::json!({"user": success.user, "token": token}))
}

/// Redeem a bot-issued login code.
pub async fn auth_login_code(state: &Arc<DaemonState>, params: &Value) -> CmdResult {
    let code = str_param(params, "code")?;

    let now = time::unix_now();
    let mut guard = state.core.lock().await;
    let core = &mut *guard;
    let success =
        flow::confirm_login_code(&core.store, &mut core.pairing, &code, now).map_err(auth_error)?;
    let token = core.sessions.issue(&success.user.id, now);

    Ok(serde_json::json!({"user": success.user, "token": token}))
}

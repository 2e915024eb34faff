//! Command handlers, grouped per domain.
//!
//! Every handler takes the shared daemon state plus the raw JSON-RPC
//! params and returns either a JSON result or a coded [`RpcError`].

pub mod auth;
pub mod bot;
pub mod market;
pub mod profile;
pub mod wallet;

use serde_json::Value;
use vault_auth::AuthError;
use vault_market::MarketError;
use vault_pay::PayError;

use crate::rpc::RpcError;
use crate::CoreState;

pub(crate) type CmdResult = std::result::Result<Value, RpcError>;

/// Required string parameter.
pub(crate) fn str_param(params: &Value, key: &str) -> std::result::Result<String, RpcError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Required unsigned integer parameter.
pub(crate) fn u64_param(params: &Value, key: &str) -> std::result::Result<u64, RpcError> {
    params
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Resolve the session token in `params` to a user id.
pub(crate) fn require_user(
    core: &CoreState,
    params: &Value,
    now: u64,
) -> std::result::Result<String, RpcError> {
    let token = params
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(RpcError::unauthorized)?;
    core.sessions
        .resolve(token, now)
        .map(|s| s.user_id.clone())
        .ok_or_else(RpcError::unauthorized)
}

/// Map an auth error onto the wire.
pub(crate) fn auth_error(e: AuthError) -> RpcError {
    match e {
        AuthError::Validation(msg) => RpcError::validation_failed(&msg),
        AuthError::UsernameTaken(username) => RpcError::username_taken(&username),
        AuthError::ChatAlreadyLinked => RpcError::chat_already_linked(),
        AuthError::UnknownRegistration => RpcError::not_found("registration"),
        AuthError::InvalidCode => RpcError::invalid_code(),
        AuthError::UnknownUser(who) => RpcError::not_found(&format!("user {who}")),
        AuthError::NoPassword => RpcError::no_password(),
        AuthError::InvalidCredentials => RpcError::invalid_credentials(),
        AuthError::Crypto(e) => RpcError::internal_error(&e.to_string()),
        AuthError::Ledger(e) => RpcError::internal_error(&e.to_string()),
        AuthError::Store(e) => RpcError::internal_error(&e.to_string()),
    }
}

/// Map a marketplace error onto the wire.
pub(crate) fn market_error(e: MarketError) -> RpcError {
    match e {
        MarketError::NotFound(detail) => RpcError::not_found(&detail),
        MarketError::Validation(msg) => RpcError::validation_failed(&msg),
        MarketError::InsufficientFunds {
            required,
            available,
        } => RpcError::insufficient_balance(required, available),
        MarketError::AlreadyOwned => RpcError::already_owned(),
        MarketError::SelfPurchase => RpcError::self_purchase(),
        MarketError::AccessDenied => RpcError::access_denied(),
        MarketError::Ledger(vault_ledger::LedgerError::InsufficientFunds {
            required,
            available,
        }) => RpcError::insufficient_balance(required, available),
        MarketError::Ledger(e) => RpcError::internal_error(&e.to_string()),
        MarketError::Store(e) => RpcError::internal_error(&e.to_string()),
    }
}

/// Map a payment error onto the wire.
pub(crate) fn pay_error(e: PayError) -> RpcError {
    match e {
        PayError::UnknownPayment(id) => RpcError::not_found(&format!("payment {id}")),
        PayError::UnknownUser(who) => RpcError::not_found(&format!("user {who}")),
        PayError::InvalidAmount => RpcError::validation_failed("payment amount must be non-zero"),
        PayError::Ledger(e) => RpcError::internal_error(&e.to_string()),
        PayError::Store(e) => RpcError::internal_error(&e.to_string()),
    }
}

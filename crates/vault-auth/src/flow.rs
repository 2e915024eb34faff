//! The registration state machine and login operations.
//!
//! All operations take `now` as a Unix-seconds argument; nothing here
//! reads the system clock, which keeps expiry deterministic under test.

use vault_store::Store;
use vault_types::ledger::TxKind;
use vault_types::user::{default_avatar, PublicUser, User, DEFAULT_BIO};
use vault_types::{ChatId, MIN_PASSWORD_LEN, MIN_USERNAME_LEN, STARTING_BONUS};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::pairing::{LoginCode, PairingRegistry, PendingRegistration, RegistrationCode};
use crate::{link, AuthError, Result};

/// Knobs the daemon wires in from its config.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Bot username embedded in registration deep links.
    pub bot_username: String,
    /// Bonus credited to every confirmed account.
    pub starting_bonus: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bot_username: "vault_bot".to_string(),
            starting_bonus: STARTING_BONUS,
        }
    }
}

/// A registration form submission. Plaintext passwords are wiped when
/// the request is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RegistrationRequest {
    #[zeroize(skip)]
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Outcome of a successful `start_registration`.
#[derive(Clone, Debug)]
pub struct StartedRegistration {
    pub reg_id: String,
    /// Deep link the registrant opens to reach the bot.
    pub deep_link: String,
}

/// What the bot should show after a registration deep link is opened.
#[derive(Clone, Debug)]
pub struct DeepLinkPrompt {
    pub username: String,
}

/// A code handed to a chat, with the username it belongs to.
#[derive(Clone, Debug)]
pub struct IssuedCode {
    pub code: String,
    pub username: String,
}

/// A completed registration or login. The daemon mints the session
/// token; the password hash never appears here.
#[derive(Clone, Debug)]
pub struct AuthSuccess {
    pub user: PublicUser,
}

/// Validate and stage a registration form submission.
///
/// Uniqueness is checked here and again at confirmation; the window in
/// between is closed by the re-check, not by reserving the name.
pub fn start_registration(
    store: &Store,
    registry: &mut PairingRegistry,
    config: &AuthConfig,
    req: &RegistrationRequest,
    now: u64,
) -> Result<StartedRegistration> {
    validate_registration(req)?;

    if store.username_taken(&req.username) {
        return Err(AuthError::UsernameTaken(req.username.clone()));
    }

    let password_hash = vault_crypto::password::hash(&req.password)?;
    let reg_id = vault_crypto::token::reg_id();
    registry.insert_pending(PendingRegistration {
        reg_id: reg_id.clone(),
        username: req.username.clone(),
        password_hash,
        created_at: now,
    });

    tracing::info!(username = %req.username, "registration started");
    Ok(StartedRegistration {
        deep_link: link::deep_link(&config.bot_username, &reg_id),
        reg_id,
    })
}

/// A registration deep link was opened in a chat.
///
/// Does not consume the pending registration; the user still has to
/// confirm. A chat that already owns an account is turned away so one
/// chat cannot complete two registrations.
pub fn on_deep_link(
    store: &Store,
    registry: &PairingRegistry,
    reg_id: &str,
    chat_id: ChatId,
    now: u64,
) -> Result<DeepLinkPrompt> {
    if store.chat_linked(chat_id) {
        return Err(AuthError::ChatAlreadyLinked);
    }
    let pending = registry
        .pending(reg_id, now)
        .ok_or(AuthError::UnknownRegistration)?;
    Ok(DeepLinkPrompt {
        username: pending.username.clone(),
    })
}

/// The chat user explicitly confirmed; issue the confirmation code.
///
/// Consumes the pending registration. The code is regenerated until it
/// is unique among live codes; the code space is small enough that
/// collisions are plausible.
pub fn issue_confirmation_code(
    store: &Store,
    registry: &mut PairingRegistry,
    reg_id: &str,
    chat_id: ChatId,
    first_name: &str,
    now: u64,
) -> Result<IssuedCode> {
    if store.chat_linked(chat_id) {
        return Err(AuthError::ChatAlreadyLinked);
    }
    let pending = registry
        .take_pending(reg_id, now)
        .ok_or(AuthError::UnknownRegistration)?;

    let mut code = vault_crypto::token::pairing_code();
    while registry.code_live(&code) {
        code = vault_crypto::token::pairing_code();
    }

    registry.insert_code(RegistrationCode {
        code: code.clone(),
        reg_id: pending.reg_id,
        chat_id,
        username: pending.username.clone(),
        password_hash: pending.password_hash,
        first_name: first_name.to_string(),
        created_at: now,
    });

    tracing::info!(username = %pending.username, chat_id, "confirmation code issued");
    Ok(IssuedCode {
        code,
        username: pending.username,
    })
}

/// Redeem a confirmation code and materialize the account.
///
/// The code is consumed before anything else, so a second call with the
/// same code always fails with [`AuthError::InvalidCode`]. Username and
/// chat uniqueness are re-checked here to close the race window since
/// `start_registration`.
pub fn confirm_registration(
    store: &mut Store,
    registry: &mut PairingRegistry,
    config: &AuthConfig,
    code: &str,
    now: u64,
) -> Result<AuthSuccess> {
    let normalized = code.trim().to_ascii_uppercase();
    let entry = registry
        .take_code(&normalized, now)
        .ok_or(AuthError::InvalidCode)?;

    if store.username_taken(&entry.username) {
        return Err(AuthError::UsernameTaken(entry.username));
    }
    if store.chat_linked(entry.chat_id) {
        return Err(AuthError::ChatAlreadyLinked);
    }

    let display_name = if entry.first_name.is_empty() {
        entry.username.clone()
    } else {
        entry.first_name.clone()
    };
    let user_id = vault_crypto::token::entity_id();
    store.insert_user(User {
        id: user_id.clone(),
        username: entry.username.clone(),
        password_hash: Some(entry.password_hash),
        chat_id: Some(entry.chat_id),
        display_name,
        bio: DEFAULT_BIO.to_string(),
        avatar_url: default_avatar(&entry.username),
        balance: 0,
        earned: 0,
        joined: now,
        inventory: vec![],
        my_products: vec![],
    })?;
    vault_ledger::credit(
        store,
        &user_id,
        config.starting_bonus,
        TxKind::Bonus,
        "Welcome bonus",
        now,
    )?;

    let user = store
        .user(&user_id)
        .ok_or_else(|| AuthError::UnknownUser(user_id.clone()))?;
    tracing::info!(username = %user.username, "registration confirmed");
    Ok(AuthSuccess {
        user: user.to_public(),
    })
}

/// Issue a login code for an already-linked chat.
pub fn request_login_code(
    store: &Store,
    registry: &mut PairingRegistry,
    chat_id: ChatId,
    now: u64,
) -> Result<IssuedCode> {
    let user = store
        .user_by_chat(chat_id)
        .ok_or_else(|| AuthError::UnknownUser(format!("chat {chat_id}")))?;

    let mut code = vault_crypto::token::pairing_code();
    while registry.login_code_live(&code) {
        code = vault_crypto::token::pairing_code();
    }
    registry.insert_login_code(LoginCode {
        code: code.clone(),
        chat_id,
        created_at: now,
    });

    Ok(IssuedCode {
        code,
        username: user.username.clone(),
    })
}

/// Redeem a login code exactly once.
pub fn confirm_login_code(
    store: &Store,
    registry: &mut PairingRegistry,
    code: &str,
    now: u64,
) -> Result<AuthSuccess> {
    let normalized = code.trim().to_ascii_uppercase();
    let entry = registry
        .take_login_code(&normalized, now)
        .ok_or(AuthError::InvalidCode)?;

    let user = store
        .user_by_chat(entry.chat_id)
        .ok_or_else(|| AuthError::UnknownUser(format!("chat {}", entry.chat_id)))?;
    Ok(AuthSuccess {
        user: user.to_public(),
    })
}

/// Password login.
pub fn login(store: &Store, username: &str, password: &str) -> Result<AuthSuccess> {
    let user = store
        .user_by_username(username)
        .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;
    let phc = user.password_hash.as_ref().ok_or(AuthError::NoPassword)?;
    if !vault_crypto::password::verify(password, phc)? {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(AuthSuccess {
        user: user.to_public(),
    })
}

fn validate_registration(req: &RegistrationRequest) -> Result<()> {
    if req.username.len() < MIN_USERNAME_LEN {
        return Err(AuthError::Validation(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if !req
        .username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AuthError::Validation(
            "username may only contain letters, digits, and underscores".to_string(),
        ));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if req.password != req.confirm_password {
        return Err(AuthError::Validation("passwords do not match".to_string()));
    }
    Ok(())
}

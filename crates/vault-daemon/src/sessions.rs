//! Session token store.
//!
//! Tokens are opaque random values mapped to user ids, never the user
//! id itself. Stale tokens read as absent and are pruned by the
//! maintenance task.

use std::collections::HashMap;

use vault_types::{UserId, SESSION_TTL_SECS};

/// A live session.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: UserId,
    pub created_at: u64,
}

/// Token-keyed session map.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token for a user.
    pub fn issue(&mut self, user_id: &str, now: u64) -> String {
        let token = vault_crypto::token::session_token();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id: user_id.to_string(),
                created_at: now,
            },
        );
        token
    }

    /// Resolve a token to its session. Stale tokens read as absent.
    pub fn resolve(&self, token: &str, now: u64) -> Option<&Session> {
        self.sessions
            .get(token)
            .filter(|s| now <= s.created_at.saturating_add(SESSION_TTL_SECS))
    }

    /// Drop stale sessions. Returns how many were dropped.
    pub fn prune(&mut self, now: u64) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| now <= s.created_at.saturating_add(SESSION_TTL_SECS));
        before - self.sessions.len()
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }
}

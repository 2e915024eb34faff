//! Pairing-code registry.
//!
//! Three maps with TTLs: pending registrations keyed by registration id,
//! confirmation codes and login codes keyed by the code itself. Expiry
//! is lazy on lookup, plus a periodic [`PairingRegistry::sweep`] so
//! abandoned entries do not accumulate. No per-entry timers.

use std::collections::HashMap;

use vault_types::{
    ChatId, LOGIN_CODE_TTL_SECS, PAIRING_CODE_TTL_SECS, REGISTRATION_TTL_SECS,
};

/// A registration form submission waiting for its deep link to be
/// opened and confirmed.
#[derive(Clone, Debug)]
pub struct PendingRegistration {
    pub reg_id: String,
    pub username: String,
    /// Hashed at submission time; the plaintext is never stored.
    pub password_hash: String,
    pub created_at: u64,
}

/// A confirmation code issued to a chat, carrying everything needed to
/// materialize the account once the code is typed back in.
#[derive(Clone, Debug)]
pub struct RegistrationCode {
    pub code: String,
    pub reg_id: String,
    pub chat_id: ChatId,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub created_at: u64,
}

/// A login code for an already-linked account.
#[derive(Clone, Debug)]
pub struct LoginCode {
    pub code: String,
    pub chat_id: ChatId,
    pub created_at: u64,
}

fn expired(created_at: u64, ttl: u64, now: u64) -> bool {
    now > created_at.saturating_add(ttl)
}

/// Registry of live pairing state. One writer at a time; the daemon
/// serializes access behind its state lock.
#[derive(Debug, Default)]
pub struct PairingRegistry {
    pending: HashMap<String, PendingRegistration>,
    codes: HashMap<String, RegistrationCode>,
    login_codes: HashMap<String, LoginCode>,
}

impl PairingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_pending(&mut self, pending: PendingRegistration) {
        self.pending.insert(pending.reg_id.clone(), pending);
    }

    /// Look up a pending registration without consuming it. Expired
    /// entries read as absent.
    pub fn pending(&self, reg_id: &str, now: u64) -> Option<&PendingRegistration> {
        self.pending
            .get(reg_id)
            .filter(|p| !expired(p.created_at, REGISTRATION_TTL_SECS, now))
    }

    /// Consume a pending registration. Expired entries read as absent
    /// (and are dropped).
    pub fn take_pending(&mut self, reg_id: &str, now: u64) -> Option<PendingRegistration> {
        let pending = self.pending.remove(reg_id)?;
        if expired(pending.created_at, REGISTRATION_TTL_SECS, now) {
            return None;
        }
        Some(pending)
    }

    pub fn insert_code(&mut self, code: RegistrationCode) {
        self.codes.insert(code.code.clone(), code);
    }

    /// Whether a confirmation code is currently live. Used by the
    /// issue-side uniqueness retry loop.
    pub fn code_live(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }

    /// Consume a confirmation code exactly once.
    pub fn take_code(&mut self, code: &str, now: u64) -> Option<RegistrationCode> {
        let entry = self.codes.remove(code)?;
        if expired(entry.created_at, PAIRING_CODE_TTL_SECS, now) {
            return None;
        }
        Some(entry)
    }

    pub fn insert_login_code(&mut self, code: LoginCode) {
        self.login_codes.insert(code.code.clone(), code);
    }

    pub fn login_code_live(&self, code: &str) -> bool {
        self.login_codes.contains_key(code)
    }

    /// Consume a login code exactly once.
    pub fn take_login_code(&mut self, code: &str, now: u64) -> Option<LoginCode> {
        let entry = self.login_codes.remove(code)?;
        if expired(entry.created_at, LOGIN_CODE_TTL_SECS, now) {
            return None;
        }
        Some(entry)
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn sweep(&mut self, now: u64) -> usize {
        let before = self.pending.len() + self.codes.len() + self.login_codes.len();
        self.pending
            .retain(|_, p| !expired(p.created_at, REGISTRATION_TTL_SECS, now));
        self.codes
            .retain(|_, c| !expired(c.created_at, PAIRING_CODE_TTL_SECS, now));
        self.login_codes
            .retain(|_, c| !expired(c.created_at, LOGIN_CODE_TTL_SECS, now));
        let dropped = before - (self.pending.len() + self.codes.len() + self.login_codes.len());
        if dropped > 0 {
            tracing::debug!(dropped, "pairing registry sweep");
        }
        dropped
    }

    /// Live entry count across all three maps.
    pub fn live_entries(&self) -> usize {
        self.pending.len() + self.codes.len() + self.login_codes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn pending(reg_id: &str, created_at: u64) -> PendingRegistration {
        PendingRegistration {
            reg_id: reg_id.to_string(),
            username: "alice".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at,
        }
    }

    #[test]
    fn test_pending_expires_after_ttl() {
        let mut registry = PairingRegistry::new();
        registry.insert_pending(pending("r1", NOW));

        assert!(registry.pending("r1", NOW + REGISTRATION_TTL_SECS).is_some());
        assert!(registry
            .pending("r1", NOW + REGISTRATION_TTL_SECS + 1)
            .is_none());
    }

    #[test]
    fn test_take_pending_consumes() {
        let mut registry = PairingRegistry::new();
        registry.insert_pending(pending("r1", NOW));

        assert!(registry.take_pending("r1", NOW + 1).is_some());
        assert!(registry.take_pending("r1", NOW + 1).is_none());
    }

    #[test]
    fn test_expired_take_drops_entry() {
        let mut registry = PairingRegistry::new();
        registry.insert_pending(pending("r1", NOW));

        assert!(registry
            .take_pending("r1", NOW + REGISTRATION_TTL_SECS + 1)
            .is_none());
        // Gone for good, not resurrected by an earlier clock.
        assert!(registry.take_pending("r1", NOW).is_none());
    }

    #[test]
    fn test_sweep_drops_only_expired() {
        let mut registry = PairingRegistry::new();
        registry.insert_pending(pending("old", NOW));
        registry.insert_pending(pending("fresh", NOW + REGISTRATION_TTL_SECS));
        registry.insert_login_code(LoginCode {
            code: "ABC123".to_string(),
            chat_id: 1,
            created_at: NOW,
        });

        let dropped = registry.sweep(NOW + REGISTRATION_TTL_SECS + 1);
        assert_eq!(dropped, 2);
        assert_eq!(registry.live_entries(), 1);
        assert!(registry.pending("fresh", NOW + REGISTRATION_TTL_SECS).is_some());
    }

    #[test]
    fn test_code_exactly_once() {
        let mut registry = PairingRegistry::new();
        registry.insert_code(RegistrationCode {
            code: "XYZ789".to_string(),
            reg_id: "r1".to_string(),
            chat_id: 7,
            username: "alice".to_string(),
            password_hash: "$argon2id$...".to_string(),
            first_name: "Alice".to_string(),
            created_at: NOW,
        });

        assert!(registry.code_live("XYZ789"));
        assert!(registry.take_code("XYZ789", NOW + 1).is_some());
        assert!(registry.take_code("XYZ789", NOW + 1).is_none());
        assert!(!registry.code_live("XYZ789"));
    }
}

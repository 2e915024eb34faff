//! # vault-ledger
//!
//! The only legal way to change an account balance.
//!
//! [`credit`] and [`debit`] pair the balance mutation with the matching
//! transaction append in one step, so the audit log and `User::balance`
//! cannot drift apart. Every other crate that moves money goes through
//! these two functions.

use vault_store::Store;
use vault_types::ledger::{Transaction, TxKind};

/// Ledger error types.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("balance arithmetic overflow")]
    Overflow,
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Credit `amount` to a user and append the matching entry.
///
/// `Sale` credits also bump the lifetime `earned` counter. Returns the
/// new balance.
pub fn credit(
    store: &mut Store,
    user_id: &str,
    amount: u64,
    kind: TxKind,
    desc: &str,
    now: u64,
) -> Result<u64> {
    let signed = i64::try_from(amount).map_err(|_| LedgerError::Overflow)?;
    let user = store
        .user_mut(user_id)
        .ok_or_else(|| LedgerError::UnknownUser(user_id.to_string()))?;

    let new_balance = user.balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
    if kind == TxKind::Sale {
        user.earned = user.earned.checked_add(amount).ok_or(LedgerError::Overflow)?;
    }
    user.balance = new_balance;

    store.push_transaction(Transaction {
        id: vault_crypto::token::entity_id(),
        user_id: user_id.to_string(),
        kind,
        amount: signed,
        desc: desc.to_string(),
        at: now,
    });

    tracing::debug!(user_id, amount, ?kind, new_balance, "ledger credit");
    Ok(new_balance)
}

/// Debit `amount` from a user and append the matching entry.
///
/// Fails with [`LedgerError::InsufficientFunds`] when the balance does
/// not cover the amount, leaving state untouched. Returns the new
/// balance.
pub fn debit(
    store: &mut Store,
    user_id: &str,
    amount: u64,
    kind: TxKind,
    desc: &str,
    now: u64,
) -> Result<u64> {
    let signed = i64::try_from(amount).map_err(|_| LedgerError::Overflow)?;
    let user = store
        .user_mut(user_id)
        .ok_or_else(|| LedgerError::UnknownUser(user_id.to_string()))?;

    let new_balance = user
        .balance
        .checked_sub(amount)
        .ok_or(LedgerError::InsufficientFunds {
            required: amount,
            available: user.balance,
        })?;
    user.balance = new_balance;

    store.push_transaction(Transaction {
        id: vault_crypto::token::entity_id(),
        user_id: user_id.to_string(),
        kind,
        amount: -signed,
        desc: desc.to_string(),
        at: now,
    });

    tracing::debug!(user_id, amount, ?kind, new_balance, "ledger debit");
    Ok(new_balance)
}

/// Net total of a user's log entries. A balance that started at zero
/// and only ever moved through [`credit`]/[`debit`] equals this.
pub fn log_total(store: &Store, user_id: &str) -> i64 {
    store
        .transactions()
        .iter()
        .filter(|t| t.user_id == user_id)
        .map(|t| t.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use vault_store::Store;
    use vault_types::ledger::TxKind;
    use vault_types::user::{default_avatar, User, DEFAULT_BIO};

    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn store_with_user(id: &str, balance: u64) -> Store {
        let mut store = Store::new();
        store
            .insert_user(User {
                id: id.to_string(),
                username: format!("user_{id}"),
                password_hash: None,
                chat_id: None,
                display_name: id.to_string(),
                bio: DEFAULT_BIO.to_string(),
                avatar_url: default_avatar(id),
                balance,
                earned: 0,
                joined: NOW,
                inventory: vec![],
                my_products: vec![],
            })
            .expect("insert user");
        store
    }

    #[test]
    fn test_credit_appends_and_mutates() {
        let mut store = store_with_user("u1", 0);
        let balance = credit(&mut store, "u1", 5000, TxKind::Bonus, "welcome", NOW).expect("credit");
        assert_eq!(balance, 5000);
        assert_eq!(store.user("u1").map(|u| u.balance), Some(5000));
        assert_eq!(log_total(&store, "u1"), 5000);
    }

    #[test]
    fn test_sale_credit_bumps_earned() {
        let mut store = store_with_user("u1", 0);
        credit(&mut store, "u1", 200, TxKind::Sale, "sale", NOW).expect("credit");
        let user = store.user("u1").expect("user");
        assert_eq!(user.earned, 200);
        assert_eq!(user.balance, 200);
    }

    #[test]
    fn test_debit_insufficient_leaves_state_untouched() {
        let mut store = store_with_user("u1", 100);
        let result = debit(&mut store, "u1", 150, TxKind::Purchase, "too much", NOW);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds {
                required: 150,
                available: 100
            })
        ));
        assert_eq!(store.user("u1").map(|u| u.balance), Some(100));
        assert!(store.transactions().is_empty());
    }

    #[test]
    fn test_balance_reconciles_with_log() {
        let mut store = store_with_user("u1", 0);
        credit(&mut store, "u1", 5000, TxKind::Bonus, "welcome", NOW).expect("credit");
        debit(&mut store, "u1", 1200, TxKind::Purchase, "buy", NOW + 1).expect("debit");
        credit(&mut store, "u1", 300, TxKind::Sale, "sell", NOW + 2).expect("credit");

        let balance = store.user("u1").map(|u| u.balance).expect("user");
        assert_eq!(i64::try_from(balance).expect("fits"), log_total(&store, "u1"));
    }

    #[test]
    fn test_unknown_user() {
        let mut store = Store::new();
        assert!(matches!(
            credit(&mut store, "ghost", 1, TxKind::Bonus, "x", NOW),
            Err(LedgerError::UnknownUser(_))
        ));
    }
}

//! # vault-pay
//!
//! External payment integration: link construction and the completion
//! webhook. The gateway is an external collaborator; nothing here makes
//! a network call. Idempotence of the webhook rests on the payment
//! status guard.

use vault_store::Store;
use vault_types::ledger::TxKind;
use vault_types::payment::{Payment, PaymentStatus};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PayError {
    #[error("unknown payment: {0}")]
    UnknownPayment(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("payment amount must be non-zero")]
    InvalidAmount,

    #[error(transparent)]
    Ledger(#[from] vault_ledger::LedgerError),

    #[error(transparent)]
    Store(#[from] vault_store::StoreError),
}

/// Convenience result type for payment operations.
pub type Result<T> = std::result::Result<T, PayError>;

/// Quickpay form endpoint the link points at.
const QUICKPAY_URL: &str = "https://yoomoney.ru/quickpay/confirm.xml";

/// Outcome of a completion webhook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credited {
    /// The ledger was credited; new balance included.
    Applied { balance: u64 },
    /// The payment was already completed; nothing was credited.
    AlreadyCompleted,
}

/// Build the hosted-form URL for a payment. Pure string templating; the
/// payment id rides along as the label the webhook echoes back.
pub fn payment_link(receiver: &str, payment_id: &str, amount: u64) -> String {
    format!(
        "{QUICKPAY_URL}?receiver={receiver}&quickpay-form=shop&targets=Vault+top-up&label={payment_id}&sum={amount}"
    )
}

/// Register a pending payment for a user.
pub fn create_payment(store: &mut Store, user_id: &str, amount: u64, now: u64) -> Result<Payment> {
    if amount == 0 {
        return Err(PayError::InvalidAmount);
    }
    if store.user(user_id).is_none() {
        return Err(PayError::UnknownUser(user_id.to_string()));
    }
    let payment = Payment {
        id: vault_crypto::token::entity_id(),
        user_id: user_id.to_string(),
        amount,
        status: PaymentStatus::Pending,
        created_at: now,
    };
    store.insert_payment(payment.clone())?;
    Ok(payment)
}

/// The gateway reported a completed payment.
///
/// Credits the ledger exactly once per payment id; replays read the
/// Completed status and return without touching the balance. The
/// credited amount is the one the gateway reports.
pub fn payment_completed(
    store: &mut Store,
    payment_id: &str,
    amount: u64,
    now: u64,
) -> Result<Credited> {
    let payment = store
        .payment(payment_id)
        .ok_or_else(|| PayError::UnknownPayment(payment_id.to_string()))?;
    if payment.status == PaymentStatus::Completed {
        tracing::debug!(payment_id, "duplicate completion webhook ignored");
        return Ok(Credited::AlreadyCompleted);
    }
    let user_id = payment.user_id.clone();

    let balance = vault_ledger::credit(store, &user_id, amount, TxKind::Deposit, "Top-up", now)?;
    if let Some(payment) = store.payment_mut(payment_id) {
        payment.status = PaymentStatus::Completed;
        payment.amount = amount;
    }

    tracing::info!(payment_id, user_id, amount, "payment completed");
    Ok(Credited::Applied { balance })
}

#[cfg(test)]
mod tests {
    use vault_types::user::{default_avatar, User, DEFAULT_BIO};

    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn store_with_user(id: &str) -> Store {
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
                balance: 0,
                earned: 0,
                joined: NOW,
                inventory: vec![],
                my_products: vec![],
            })
            .expect("user");
        store
    }

    #[test]
    fn test_payment_link_carries_label_and_sum() {
        let url = payment_link("410011234567890", "pay-1", 500);
        assert!(url.starts_with(QUICKPAY_URL));
        assert!(url.contains("label=pay-1"));
        assert!(url.contains("sum=500"));
    }

    #[test]
    fn test_completion_credits_once() {
        let mut store = store_with_user("u1");
        let payment = create_payment(&mut store, "u1", 500, NOW).expect("create");

        let first = payment_completed(&mut store, &payment.id, 500, NOW + 10).expect("first");
        assert_eq!(first, Credited::Applied { balance: 500 });

        let second = payment_completed(&mut store, &payment.id, 500, NOW + 20).expect("second");
        assert_eq!(second, Credited::AlreadyCompleted);

        assert_eq!(store.user("u1").map(|u| u.balance), Some(500));
        assert_eq!(store.transactions().len(), 1);
    }

    #[test]
    fn test_unknown_payment_rejected() {
        let mut store = store_with_user("u1");
        assert!(matches!(
            payment_completed(&mut store, "missing", 500, NOW),
            Err(PayError::UnknownPayment(_))
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut store = store_with_user("u1");
        assert!(matches!(
            create_payment(&mut store, "u1", 0, NOW),
            Err(PayError::InvalidAmount)
        ));
    }
}

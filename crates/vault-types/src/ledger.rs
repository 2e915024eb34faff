//! Wallet ledger structures.

use serde::{Deserialize, Serialize};

use crate::{TransactionId, UserId};

/// Kinds of balance-affecting events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Bonus,
    Sale,
    Purchase,
    Deposit,
    SubscriptionRenewal,
}

/// An append-only ledger entry.
///
/// `amount` is signed: credits are positive, debits negative. The ledger
/// must reconcile with `User::balance` at all times.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub kind: TxKind,
    pub amount: i64,
    pub desc: String,
    pub at: u64,
}

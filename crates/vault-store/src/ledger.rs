//! Append-only transaction log.

use vault_types::ledger::Transaction;

use crate::Store;

impl Store {
    /// Append a ledger entry. The log is never rewritten.
    pub fn push_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// A user's entries, newest first, capped at `limit`.
    pub fn transactions_for(&self, user_id: &str, limit: usize) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit)
            .collect()
    }

    /// The whole log in append order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

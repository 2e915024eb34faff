//! External payment records.

use vault_types::payment::Payment;

use crate::{Result, Store, StoreError};

impl Store {
    pub fn insert_payment(&mut self, payment: Payment) -> Result<()> {
        if self.payments.contains_key(&payment.id) {
            return Err(StoreError::Conflict(format!("payment id {}", payment.id)));
        }
        self.payments.insert(payment.id.clone(), payment);
        Ok(())
    }

    pub fn payment(&self, id: &str) -> Option<&Payment> {
        self.payments.get(id)
    }

    pub fn payment_mut(&mut self, id: &str) -> Option<&mut Payment> {
        self.payments.get_mut(id)
    }
}

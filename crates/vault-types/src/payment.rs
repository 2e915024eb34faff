//! External payment structures.

use serde::{Deserialize, Serialize};

use crate::{PaymentId, UserId};

/// Lifecycle of an external payment. The status guard makes the
/// completion webhook idempotent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

/// A payment registered with the external gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub amount: u64,
    pub status: PaymentStatus,
    pub created_at: u64,
}

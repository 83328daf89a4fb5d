use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::cards::{PaymentIntentId, PaymentMethodId};

/// Reference values for `transactions.transaction_status_id`, seeded by
/// migration. The checkout flow only ever writes `Succeeded`, since it runs
/// after provider confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending = 1,
    Succeeded = 2,
}

impl TransactionStatus {
    pub fn id(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub amount: i64,
    pub currency: String,
    pub last_four: String,
    pub expiry_month: i32,
    pub expiry_year: i32,
    pub payment_intent: String,
    pub payment_method: String,
    pub bank_return_code: String,
    pub transaction_status_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: i64,
    pub currency: String,
    pub last_four: String,
    pub expiry_month: i32,
    pub expiry_year: i32,
    pub payment_intent: PaymentIntentId,
    pub payment_method: PaymentMethodId,
    pub bank_return_code: String,
    pub status: TransactionStatus,
}

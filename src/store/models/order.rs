use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Reference values for `orders.status_id`, seeded by migration. New orders
/// always start at `PendingFulfillment`; later transitions are owned by
/// fulfillment tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    PendingFulfillment = 1,
    Fulfilled = 2,
    Cancelled = 3,
}

impl OrderStatus {
    pub fn id(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub widget_id: i64,
    pub transaction_id: i64,
    pub customer_id: i64,
    pub status_id: i32,
    pub quantity: i32,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for an order row, carrying the identifiers generated by the
/// two preceding inserts.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub widget_id: i64,
    pub transaction_id: i64,
    pub customer_id: i64,
    pub status: OrderStatus,
    pub quantity: i32,
    pub amount: i64,
}

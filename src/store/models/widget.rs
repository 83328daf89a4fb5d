use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Catalog item. Read-only from the checkout flow's perspective; inventory
/// is decremented by fulfillment tooling, not here.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Widget {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub inventory_level: i32,
    pub price: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

use async_trait::async_trait;
use thiserror::Error;

pub mod models;
mod pg;

pub use pg::{connect, PgStore};

use models::{Customer, NewCustomer, NewOrder, NewTransaction, Widget};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("statement timed out")]
    Timeout,

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence gateway for the storefront. Catalog reads go straight through;
/// the write chain of a confirmation goes through a [`SaleScope`].
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Look up a catalog item, failing with [`StoreError::NotFound`] when no
    /// row matches.
    async fn get_widget(&self, id: i64) -> Result<Widget, StoreError>;

    /// Open an atomic scope covering the customer -> transaction -> order
    /// write chain of one confirmation.
    async fn begin_sale(&self) -> Result<Box<dyn SaleScope>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Handle over the write chain of a single confirmation. Each insert sets its
/// own timestamps and returns the generated identifier. Dropping the handle
/// without calling `commit` rolls every staged row back.
#[async_trait]
pub trait SaleScope: Send {
    async fn find_customer_by_email(&mut self, email: &str)
        -> Result<Option<Customer>, StoreError>;

    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<i64, StoreError>;

    async fn insert_transaction(&mut self, txn: NewTransaction) -> Result<i64, StoreError>;

    async fn insert_order(&mut self, order: NewOrder) -> Result<i64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use super::models::{Customer, NewCustomer, NewOrder, NewTransaction, Widget};
use super::{SaleScope, SaleStore, StoreError};
use crate::config::DatabaseConfig;

/// Create the shared connection pool and run pending migrations.
pub async fn connect(cfg: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connection_timeout))
        .connect(&cfg.url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    info!("database pool ready");
    Ok(pool)
}

pub struct PgStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, cfg: &DatabaseConfig) -> Self {
        Self {
            pool,
            query_timeout: Duration::from_millis(cfg.query_timeout_ms),
        }
    }
}

/// Bound a statement future with the configured per-statement deadline.
async fn deadline<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, sqlx::Error>> + Send,
) -> Result<T, StoreError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout),
    }
}

#[async_trait]
impl SaleStore for PgStore {
    async fn get_widget(&self, id: i64) -> Result<Widget, StoreError> {
        let widget = deadline(
            self.query_timeout,
            sqlx::query_as::<_, Widget>(
                "SELECT id, name, description, inventory_level, price,
                        COALESCE(image, '') AS image, created_at, updated_at
                 FROM widgets
                 WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;

        widget.ok_or_else(|| StoreError::NotFound(format!("widget {}", id)))
    }

    async fn begin_sale(&self) -> Result<Box<dyn SaleScope>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSaleScope {
            tx,
            query_timeout: self.query_timeout,
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        deadline(
            self.query_timeout,
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

struct PgSaleScope {
    tx: Transaction<'static, Postgres>,
    query_timeout: Duration,
}

#[async_trait]
impl SaleScope for PgSaleScope {
    async fn find_customer_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<Customer>, StoreError> {
        deadline(
            self.query_timeout,
            sqlx::query_as::<_, Customer>(
                "SELECT id, first_name, last_name, email, created_at, updated_at
                 FROM customers
                 WHERE email = $1
                 ORDER BY id
                 LIMIT 1",
            )
            .bind(email)
            .fetch_optional(&mut *self.tx),
        )
        .await
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<i64, StoreError> {
        let now = Utc::now();
        let (id,): (i64,) = deadline(
            self.query_timeout,
            sqlx::query_as(
                "INSERT INTO customers (first_name, last_name, email, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $4)
                 RETURNING id",
            )
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(now)
            .fetch_one(&mut *self.tx),
        )
        .await?;
        Ok(id)
    }

    async fn insert_transaction(&mut self, txn: NewTransaction) -> Result<i64, StoreError> {
        let now = Utc::now();
        let (id,): (i64,) = deadline(
            self.query_timeout,
            sqlx::query_as(
                "INSERT INTO transactions
                     (amount, currency, last_four, expiry_month, expiry_year,
                      payment_intent, payment_method, bank_return_code,
                      transaction_status_id, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
                 RETURNING id",
            )
            .bind(txn.amount)
            .bind(&txn.currency)
            .bind(&txn.last_four)
            .bind(txn.expiry_month)
            .bind(txn.expiry_year)
            .bind(&txn.payment_intent.0)
            .bind(&txn.payment_method.0)
            .bind(&txn.bank_return_code)
            .bind(txn.status.id())
            .bind(now)
            .fetch_one(&mut *self.tx),
        )
        .await?;
        Ok(id)
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<i64, StoreError> {
        let now = Utc::now();
        let (id,): (i64,) = deadline(
            self.query_timeout,
            sqlx::query_as(
                "INSERT INTO orders
                     (widget_id, transaction_id, customer_id, status_id,
                      quantity, amount, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                 RETURNING id",
            )
            .bind(order.widget_id)
            .bind(order.transaction_id)
            .bind(order.customer_id)
            .bind(order.status.id())
            .bind(order.quantity)
            .bind(order.amount)
            .bind(now)
            .fetch_one(&mut *self.tx),
        )
        .await?;
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

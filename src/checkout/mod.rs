use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::cards::{PaymentGateway, PaymentIntentId, PaymentMethodId, ProviderError};
use crate::money::{self, AmountError};
use crate::store::models::{NewCustomer, NewOrder, NewTransaction, OrderStatus, TransactionStatus};
use crate::store::{SaleStore, StoreError};

/// Form fields posted back by the payment page after a completed client-side
/// authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfirmation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub payment_intent: PaymentIntentId,
    pub payment_method: PaymentMethodId,
    pub payment_amount: String,
    pub payment_currency: String,
    pub product_id: i64,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("invalid submission: {0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl From<AmountError> for CheckoutError {
    fn from(err: AmountError) -> Self {
        CheckoutError::Validation(format!("payment_amount: {}", err))
    }
}

/// View data for the confirmation page. The field names are the contract
/// with the `succeeded` template.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub email: String,
    pub pi: String,
    pub pm: String,
    pub pa: String,
    pub pc: String,
    #[serde(rename = "lastFour")]
    pub last_four: String,
    #[serde(rename = "expiryMonth")]
    pub expiry_month: i32,
    #[serde(rename = "expiryYear")]
    pub expiry_year: i32,
    pub bank_return_code: String,
    pub first_name: String,
    pub last_name: String,
}

impl Receipt {
    /// Key/value view consumed by the template renderer.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("email", self.email.clone()),
            ("pi", self.pi.clone()),
            ("pm", self.pm.clone()),
            ("pa", self.pa.clone()),
            ("pc", self.pc.clone()),
            ("lastFour", self.last_four.clone()),
            ("expiryMonth", self.expiry_month.to_string()),
            ("expiryYear", self.expiry_year.to_string()),
            ("bank_return_code", self.bank_return_code.clone()),
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
        ]
    }
}

/// Reconciles confirmation submissions: fetches authoritative charge state
/// from the provider, normalizes the submitted amount, and records the sale.
pub struct CheckoutService {
    payments: Arc<dyn PaymentGateway>,
    store: Arc<dyn SaleStore>,
    dedupe_customers: bool,
}

impl CheckoutService {
    pub fn new(
        payments: Arc<dyn PaymentGateway>,
        store: Arc<dyn SaleStore>,
        dedupe_customers: bool,
    ) -> Self {
        Self {
            payments,
            store,
            dedupe_customers,
        }
    }

    /// Drive a submission through the confirmation chain. Every step is
    /// terminal on failure and nothing is retried. Both provider lookups and
    /// the amount parse happen before the write scope opens, so a failure
    /// there leaves no rows at all; a failure inside the scope rolls the
    /// whole sale back.
    #[instrument(
        skip(self, submission),
        fields(payment_intent = %submission.payment_intent, product_id = submission.product_id)
    )]
    pub async fn confirm(
        &self,
        submission: PaymentConfirmation,
    ) -> Result<Receipt, CheckoutError> {
        let intent = self
            .payments
            .retrieve_payment_intent(&submission.payment_intent)
            .await?;
        let method = self
            .payments
            .retrieve_payment_method(&submission.payment_method)
            .await?;
        let bank_return_code = intent.bank_return_code()?.to_string();

        let amount = money::parse_minor_units(&submission.payment_amount)?;

        let mut scope = self.store.begin_sale().await?;

        let customer_id = if self.dedupe_customers {
            match scope.find_customer_by_email(&submission.email).await? {
                Some(existing) => existing.id,
                None => scope.insert_customer(submission.customer()).await?,
            }
        } else {
            scope.insert_customer(submission.customer()).await?
        };

        let transaction_id = scope
            .insert_transaction(NewTransaction {
                amount,
                currency: submission.payment_currency.clone(),
                last_four: method.card.last4.clone(),
                expiry_month: method.card.exp_month as i32,
                expiry_year: method.card.exp_year as i32,
                payment_intent: submission.payment_intent.clone(),
                payment_method: submission.payment_method.clone(),
                bank_return_code: bank_return_code.clone(),
                status: TransactionStatus::Succeeded,
            })
            .await?;

        let order_id = scope
            .insert_order(NewOrder {
                widget_id: submission.product_id,
                transaction_id,
                customer_id,
                status: OrderStatus::PendingFulfillment,
                quantity: 1,
                amount,
            })
            .await?;

        scope.commit().await?;
        info!(order_id, transaction_id, customer_id, "sale recorded");

        Ok(Receipt {
            email: submission.email,
            pi: submission.payment_intent.0,
            pm: submission.payment_method.0,
            pa: money::format_minor_units(amount),
            pc: submission.payment_currency,
            last_four: method.card.last4,
            expiry_month: method.card.exp_month as i32,
            expiry_year: method.card.exp_year as i32,
            bank_return_code,
            first_name: submission.first_name,
            last_name: submission.last_name,
        })
    }
}

impl PaymentConfirmation {
    fn customer(&self) -> NewCustomer {
        NewCustomer {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

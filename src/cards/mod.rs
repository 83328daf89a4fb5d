use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod stripe;

pub use stripe::StripeClient;

/// Opaque payment-intent identifier. The format is owned by the provider;
/// nothing here validates or interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentIntentId(pub String);

/// Opaque payment-method identifier issued by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodId(pub String);

impl std::fmt::Display for PaymentIntentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("payment provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment intent has no charge record")]
    MissingCharge,
}

/// Authorization state of a charge attempt as the provider last saw it.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentSnapshot {
    pub id: PaymentIntentId,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub charges: ChargeList,
}

impl PaymentIntentSnapshot {
    /// The authoritative processor return code: the first associated charge.
    pub fn bank_return_code(&self) -> Result<&str, ProviderError> {
        self.charges
            .data
            .first()
            .map(|charge| charge.id.as_str())
            .ok_or(ProviderError::MissingCharge)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargeList {
    #[serde(default)]
    pub data: Vec<ChargeSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeSnapshot {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// The card behind a payment method, as needed for the receipt and the
/// transaction record.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodSnapshot {
    pub id: PaymentMethodId,
    pub card: CardSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardSnapshot {
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: u32,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Read-only client for the external charge-authorization service. Each call
/// is a fresh network round trip; snapshots are never cached, since they
/// must reflect the provider's latest authorization record.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn retrieve_payment_intent(
        &self,
        id: &PaymentIntentId,
    ) -> Result<PaymentIntentSnapshot, ProviderError>;

    async fn retrieve_payment_method(
        &self,
        id: &PaymentMethodId,
    ) -> Result<PaymentMethodSnapshot, ProviderError>;
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{
    PaymentGateway, PaymentIntentId, PaymentIntentSnapshot, PaymentMethodId,
    PaymentMethodSnapshot, ProviderError,
};
use crate::config::StripeConfig;

/// REST client for the Stripe API, authenticated with the account's secret
/// key. The request timeout comes from configuration so every provider call
/// is bounded.
#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(cfg: &StripeConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.api_base.trim_end_matches('/').to_string(),
            secret_key: cfg.secret_key.clone(),
        })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|detail| detail.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "unknown provider error".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn retrieve_payment_intent(
        &self,
        id: &PaymentIntentId,
    ) -> Result<PaymentIntentSnapshot, ProviderError> {
        self.get_json(&format!("payment_intents/{}", id)).await
    }

    async fn retrieve_payment_method(
        &self,
        id: &PaymentMethodId,
    ) -> Result<PaymentMethodSnapshot, ProviderError> {
        self.get_json(&format!("payment_methods/{}", id)).await
    }
}

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// HTTP client for the external QR payment provider. The provider is a
/// black box: `initiate` returns a hosted pay-URL, `query_status` reports
/// the provider-side state of an order.
#[derive(Clone)]
pub struct PaymentProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct InitiateRequest<'a> {
    order_id: &'a str,
    amount: u64,
    order_info: &'a str,
}

#[derive(Deserialize)]
struct InitiateResponse {
    pay_url: String,
}

#[derive(Deserialize)]
pub struct ProviderStatus {
    pub result_code: i32,
    pub trans_id: Option<String>,
}

impl PaymentProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("PAYMENT_PROVIDER_URL")
            .unwrap_or_else(|_| "http://localhost:9090".to_string());
        Self::new(base_url)
    }

    pub async fn initiate(
        &self,
        order_id: &str,
        amount: u64,
        order_info: &str,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/create", self.base_url);
        let body = InitiateRequest {
            order_id,
            amount,
            order_info,
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ServiceError::ProviderUnavailable(format!(
                "provider returned {}",
                resp.status()
            )));
        }

        let resp: InitiateResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(e.to_string()))?;
        Ok(resp.pay_url)
    }

    pub async fn query_status(&self, order_id: &str) -> Result<ProviderStatus, ServiceError> {
        let url = format!("{}/status", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("order_id", order_id)])
            .send()
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ServiceError::ProviderUnavailable(format!(
                "provider returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(e.to_string()))
    }
}

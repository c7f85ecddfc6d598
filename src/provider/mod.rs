//! HTTP client for the external payment provider.
//!
//! The provider is a capability behind a single `disburse` call; its
//! confirmation webhook flow lives outside this service. Calls are made
//! after a payout enters `processing` and the returned transaction id is
//! recorded when the payout is completed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::provider::ProviderError;

static DISBURSEMENTS_PATH: &str = "/v1/disbursements";

#[derive(Serialize)]
struct DisburseRequest<'a> {
    amount: Decimal,
    currency: &'a str,
    destination: &'a str,
}

#[derive(Deserialize)]
struct DisburseResponse {
    id: String,
}

#[derive(Clone)]
pub struct PaymentProviderClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl PaymentProviderClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ProviderError> {
        reqwest::Url::parse(base_url)
            .map_err(|_| ProviderError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Requests a disbursement and returns the provider's transaction id.
    pub async fn disburse(
        &self,
        amount: Decimal,
        currency: &str,
        destination: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}{}", self.base_url, DISBURSEMENTS_PATH);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&DisburseRequest {
                amount,
                currency,
                destination,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();

            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: DisburseResponse = response.json().await?;

        Ok(body.id)
    }
}

use std::time::Duration;

use reqwest::{Response, StatusCode, Url};
use serde_json::Value;

use crate::models::pix::{IdempotencyKey, MercadoPagoPayment};
use crate::settings;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Mercado Pago rejected the request with status {status}")]
    Rejected { status: StatusCode, payload: Value },
    #[error("{0}")]
    Transport(String),
}

impl ProviderError {
    /// The provider's own error body, when it sent one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ProviderError::Rejected { payload, .. } => Some(payload),
            ProviderError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}

#[derive(Clone)]
pub struct MercadoPagoApi {
    access_token: String,
    url: Url,
    client: reqwest::Client,
}

impl MercadoPagoApi {
    pub fn new(settings: &settings::MercadoPago) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;
        let url = Url::parse(&settings.url)?;

        Ok(Self {
            access_token: settings.access_token.clone(),
            url,
            client,
        })
    }

    pub async fn create_payment(
        &self,
        payment: &MercadoPagoPayment,
        idempotency_key: IdempotencyKey,
    ) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(&["v1", "payments"])?)
            .bearer_auth(&self.access_token)
            .header("X-Idempotency-Key", idempotency_key.to_string())
            .json(payment)
            .send()
            .await?;

        read_body(response).await
    }

    pub async fn get_payment(&self, id: &str) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(self.endpoint(&["v1", "payments", id])?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        read_body(response).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transport(format!("invalid provider url: {}", self.url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

async fn read_body(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&text)
            .map_err(|e| ProviderError::Transport(format!("invalid provider response: {}", e)));
    }

    let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));

    Err(ProviderError::Rejected { status, payload })
}

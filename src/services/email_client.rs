use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RelayError;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Fails with `RelayError::SendFailed` carrying the provider's message.
    async fn send(&self, email: &OutboundEmail) -> Result<(), RelayError>;
}

/// Transactional email through the Resend HTTP API.
pub struct ResendClient {
    client: Client,
    api_key: String,
    url: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
}

impl ResendClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        let client = reqwest::Client::new();

        ResendClient {
            client,
            api_key,
            url: format!("{}/emails", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<(), RelayError> {
        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| {
                log::error!("Got error from email api: {:?}", e);
                RelayError::SendFailed(e.to_string())
            })?;

        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let message = match res.json::<ApiErrorResponse>().await {
            Ok(json) => json.message,
            Err(e) => {
                log::error!("Error when deserializing email api error: {:?}", e);
                None
            }
        };
        log::error!("Email api answered {} with {:?}", status, message);

        Err(RelayError::SendFailed(
            message.unwrap_or_else(|| "send_failed".to_string()),
        ))
    }
}

use super::{ChannelAdapter, Delivery, DeliveryTarget};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const SUBJECT: &str = "Update on your workshop appointment";

/// Transactional email API channel.
#[derive(Clone)]
pub struct EmailChannel {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    sender: String,
}

#[derive(Debug, Deserialize)]
struct EmailApiResponse {
    message_id: Option<String>,
}

impl EmailChannel {
    pub fn new(client: reqwest::Client, api_url: String, api_token: String, sender: String) -> Self {
        Self {
            client,
            api_url,
            api_token,
            sender,
        }
    }
}

#[async_trait]
impl ChannelAdapter for EmailChannel {
    async fn deliver(&self, target: &DeliveryTarget, body: &str) -> Result<Delivery> {
        let address = match target {
            DeliveryTarget::Email(address) => address,
            other => {
                return Err(AppError::Validation(format!(
                    "Email channel requires an email target, got {other:?}"
                )))
            }
        };

        let response = self
            .client
            .post(format!("{}/email", self.api_url))
            .header("X-Server-Token", &self.api_token)
            .json(&json!({
                "from": self.sender,
                "to": address,
                "subject": SUBJECT,
                "text_body": body,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Email API returned {status}: {detail}"
            )));
        }

        let parsed: EmailApiResponse = response.json().await?;
        debug!("Email accepted for {}", address);

        Ok(Delivery {
            provider_message_id: parsed.message_id,
        })
    }
}

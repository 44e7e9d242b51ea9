use super::{ChannelAdapter, Delivery, DeliveryTarget};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// SMS gateway channel. One POST per delivery, no retries.
#[derive(Clone)]
pub struct SmsChannel {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
}

#[derive(Debug, Deserialize)]
struct SmsGatewayResponse {
    message_id: Option<String>,
}

impl SmsChannel {
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, sender: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            sender,
        }
    }
}

#[async_trait]
impl ChannelAdapter for SmsChannel {
    async fn deliver(&self, target: &DeliveryTarget, body: &str) -> Result<Delivery> {
        let phone = match target {
            DeliveryTarget::Phone(phone) => phone,
            other => {
                return Err(AppError::Validation(format!(
                    "SMS channel requires a phone target, got {other:?}"
                )))
            }
        };

        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.sender,
                "to": phone,
                "body": body,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "SMS gateway returned {status}: {detail}"
            )));
        }

        let parsed: SmsGatewayResponse = response.json().await?;
        debug!("SMS accepted for {}", phone);

        Ok(Delivery {
            provider_message_id: parsed.message_id,
        })
    }
}

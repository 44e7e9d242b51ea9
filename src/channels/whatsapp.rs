use super::{ChannelAdapter, Delivery, DeliveryTarget};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// WhatsApp Business API channel.
#[derive(Clone)]
pub struct WhatsAppChannel {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct WhatsAppResponse {
    #[serde(default)]
    messages: Vec<WhatsAppMessage>,
}

#[derive(Debug, Deserialize)]
struct WhatsAppMessage {
    id: String,
}

impl WhatsAppChannel {
    pub fn new(client: reqwest::Client, api_url: String, api_token: String) -> Self {
        Self {
            client,
            api_url,
            api_token,
        }
    }
}

#[async_trait]
impl ChannelAdapter for WhatsAppChannel {
    async fn deliver(&self, target: &DeliveryTarget, body: &str) -> Result<Delivery> {
        let phone = match target {
            DeliveryTarget::Phone(phone) => phone,
            other => {
                return Err(AppError::Validation(format!(
                    "WhatsApp channel requires a phone target, got {other:?}"
                )))
            }
        };

        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .bearer_auth(&self.api_token)
            .json(&json!({
                "messaging_product": "whatsapp",
                "to": phone,
                "type": "text",
                "text": { "body": body },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "WhatsApp API returned {status}: {detail}"
            )));
        }

        let parsed: WhatsAppResponse = response.json().await?;
        debug!("WhatsApp message accepted for {}", phone);

        Ok(Delivery {
            provider_message_id: parsed.messages.into_iter().next().map(|m| m.id),
        })
    }
}

use super::{ChannelAdapter, Delivery, DeliveryTarget};
use crate::device::device_repository::DeviceTokenStore;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// FCM push channel. Resolves the customer to their active device tokens
/// before any outbound call; a customer with no active token fails fast
/// with `NoActiveDevice`.
#[derive(Clone)]
pub struct PushChannel {
    client: reqwest::Client,
    api_url: String,
    server_key: String,
    devices: Arc<dyn DeviceTokenStore>,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    message_id: Option<String>,
    error: Option<String>,
}

impl PushChannel {
    pub fn new(
        client: reqwest::Client,
        api_url: String,
        server_key: String,
        devices: Arc<dyn DeviceTokenStore>,
    ) -> Self {
        Self {
            client,
            api_url,
            server_key,
            devices,
        }
    }

    async fn send_to_token(&self, fcm_token: &str, body: &str) -> Result<Option<String>> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&json!({
                "to": fcm_token,
                "notification": { "body": body },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("FCM returned {status}: {detail}")));
        }

        let parsed: FcmResponse = response.json().await?;
        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Provider("FCM returned no result entry".to_string()))?;

        if let Some(error) = result.error {
            return Err(AppError::Provider(format!("FCM rejected message: {error}")));
        }

        Ok(result.message_id)
    }
}

#[async_trait]
impl ChannelAdapter for PushChannel {
    async fn deliver(&self, target: &DeliveryTarget, body: &str) -> Result<Delivery> {
        let customer_id = match target {
            DeliveryTarget::Push { customer_id } => *customer_id,
            other => {
                return Err(AppError::Validation(format!(
                    "Push channel requires a customer target, got {other:?}"
                )))
            }
        };

        let tokens = self.devices.find_active_for_customer(customer_id).await?;
        if tokens.is_empty() {
            return Err(AppError::NoActiveDevice(format!(
                "Customer {customer_id} has no active device token"
            )));
        }

        // Deliver to every active device; the first provider id is the one
        // recorded on the notification. The attempt only fails when no
        // device accepted the message.
        let mut provider_message_id = None;
        let mut delivered = 0usize;
        let mut last_error = None;
        for token in &tokens {
            match self.send_to_token(&token.fcm_token, body).await {
                Ok(message_id) => {
                    debug!("Push delivered to device {}", token.id);
                    delivered += 1;
                    if provider_message_id.is_none() {
                        provider_message_id = message_id;
                    }
                }
                Err(e) => {
                    warn!("Push to device {} failed: {}", token.id, e);
                    last_error = Some(e);
                }
            }
        }

        if delivered == 0 {
            return Err(last_error.unwrap_or(AppError::InternalError));
        }

        Ok(Delivery { provider_message_id })
    }
}

pub mod email;
pub mod push;
pub mod sms;
pub mod whatsapp;

pub use email::EmailChannel;
pub use push::PushChannel;
pub use sms::SmsChannel;
pub use whatsapp::WhatsAppChannel;

use crate::error::Result;
use crate::notification::notification_models::NotificationChannel;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Where a single delivery attempt goes. Push targets are resolved to device
/// tokens by the push adapter itself; the other channels take the literal
/// contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    Push { customer_id: Uuid },
    Phone(String),
    Email(String),
}

/// Outcome of a successful delivery attempt.
#[derive(Debug, Clone, Default)]
pub struct Delivery {
    pub provider_message_id: Option<String>,
}

/// A stateless boundary call to one external provider. Adapters never retry;
/// provider failures surface as `AppError::Provider` with the provider
/// detail carried opaquely.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    async fn deliver(&self, target: &DeliveryTarget, body: &str) -> Result<Delivery>;
}

/// One adapter per supported channel, injected into the lifecycle manager.
#[derive(Clone)]
pub struct ChannelSet {
    pub push: Arc<dyn ChannelAdapter>,
    pub sms: Arc<dyn ChannelAdapter>,
    pub whatsapp: Arc<dyn ChannelAdapter>,
    pub email: Arc<dyn ChannelAdapter>,
}

impl ChannelSet {
    pub fn adapter_for(&self, channel: &NotificationChannel) -> Arc<dyn ChannelAdapter> {
        match channel {
            NotificationChannel::Push => self.push.clone(),
            NotificationChannel::Sms => self.sms.clone(),
            NotificationChannel::Whatsapp => self.whatsapp.clone(),
            NotificationChannel::Email => self.email.clone(),
        }
    }
}

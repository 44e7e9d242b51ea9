use crate::db::DbPool;
use crate::device::device_repository::DeviceTokenRepository;
use crate::notification::notification_service::NotificationService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub notification_service: NotificationService,
    pub device_repository: DeviceTokenRepository,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub fcm_api_url: String,
    pub fcm_server_key: String,
    pub sms_api_url: String,
    pub sms_api_key: String,
    pub sms_sender: String,
    pub whatsapp_api_url: String,
    pub whatsapp_api_token: String,
    pub email_api_url: String,
    pub email_api_token: String,
    pub email_sender: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            fcm_api_url: std::env::var("FCM_API_URL")
                .unwrap_or_else(|_| "https://fcm.googleapis.com/fcm/send".to_string()),
            fcm_server_key: std::env::var("FCM_SERVER_KEY").expect("FCM_SERVER_KEY must be set"),
            sms_api_url: std::env::var("SMS_API_URL").expect("SMS_API_URL must be set"),
            sms_api_key: std::env::var("SMS_API_KEY").expect("SMS_API_KEY must be set"),
            sms_sender: std::env::var("SMS_SENDER").expect("SMS_SENDER must be set"),
            whatsapp_api_url: std::env::var("WHATSAPP_API_URL")
                .expect("WHATSAPP_API_URL must be set"),
            whatsapp_api_token: std::env::var("WHATSAPP_API_TOKEN")
                .expect("WHATSAPP_API_TOKEN must be set"),
            email_api_url: std::env::var("EMAIL_API_URL").expect("EMAIL_API_URL must be set"),
            email_api_token: std::env::var("EMAIL_API_TOKEN").expect("EMAIL_API_TOKEN must be set"),
            email_sender: std::env::var("EMAIL_SENDER").expect("EMAIL_SENDER must be set"),
        }
    }
}

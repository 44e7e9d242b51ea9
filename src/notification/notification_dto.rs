use super::notification_models::{NotificationChannel, NotificationStatus, NotificationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleNotificationRequest {
    pub booking_id: Uuid,
    pub notification_type: NotificationType,
    pub channel: NotificationChannel,
    /// Past timestamps are allowed; the record is then immediately eligible
    /// for delivery.
    pub scheduled_for: DateTime<Utc>,
    #[validate(length(min = 1, max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduledNotificationResponse {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub scheduled_for: DateTime<Utc>,
    pub status: NotificationStatus,
}

/// Ad-hoc send: no prior notification record, channels chosen by which
/// contact fields are present.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    #[validate(length(min = 8, max = 20))]
    pub phone_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    pub notification_type: NotificationType,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendNotificationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendWhatsAppRequest {
    #[validate(length(min = 8, max = 20))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendWhatsAppResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationStatusResponse {
    pub id: Uuid,
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_rejects_bad_email() {
        let req = SendNotificationRequest {
            phone_number: None,
            email: Some("not-an-email".to_string()),
            message: "hello".to_string(),
            notification_type: NotificationType::Custom,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_send_request_rejects_empty_message() {
        let req = SendNotificationRequest {
            phone_number: Some("+5511999990000".to_string()),
            email: None,
            message: String::new(),
            notification_type: NotificationType::Custom,
        };
        assert!(req.validate().is_err());
    }
}

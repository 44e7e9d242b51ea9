pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;

pub use notification_dto::{
    NotificationStatusResponse, ScheduleNotificationRequest, ScheduledNotificationResponse,
    SendNotificationRequest, SendNotificationResponse, SendWhatsAppRequest, SendWhatsAppResponse,
};
pub use notification_handlers::{
    delete_notification, get_pending_notifications, mark_notification_sent, schedule_notification,
    send_notification, send_scheduled_notification, send_whatsapp_message,
};
pub use notification_models::{
    Notification, NotificationChannel, NotificationStatus, NotificationType, PendingNotification,
};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use notification_service::NotificationService;

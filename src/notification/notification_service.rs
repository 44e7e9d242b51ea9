use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::notification_dto::{
    ScheduleNotificationRequest, SendNotificationRequest, SendNotificationResponse,
    SendWhatsAppRequest, SendWhatsAppResponse,
};
use super::notification_models::{
    Notification, NotificationChannel, NotificationType, PendingNotification,
};
use super::notification_repository::{NewNotification, NotificationStore, ResolvedOutcome};
use crate::booking::{booking_repository::BookingDirectory, Booking};
use crate::channels::{ChannelSet, DeliveryTarget};
use crate::error::{AppError, Result};
use crate::workshop::workshop_repository::WorkshopDirectory;

/// Owns notification records and their state transitions. Collaborators are
/// injected; the service itself holds no mutable state.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    bookings: Arc<dyn BookingDirectory>,
    workshops: Arc<dyn WorkshopDirectory>,
    channels: ChannelSet,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        bookings: Arc<dyn BookingDirectory>,
        workshops: Arc<dyn WorkshopDirectory>,
        channels: ChannelSet,
    ) -> Self {
        Self {
            store,
            bookings,
            workshops,
            channels,
        }
    }

    /// Create a pending notification. Scheduling never sends; a past
    /// `scheduled_for` simply makes the record immediately due.
    pub async fn schedule(
        &self,
        workshop_id: Uuid,
        payload: ScheduleNotificationRequest,
    ) -> Result<Notification> {
        let workshop = self
            .workshops
            .find_by_id(workshop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workshop not found".to_string()))?;

        if !workshop.is_approved {
            return Err(AppError::Validation(
                "Workshop is not approved to send notifications".to_string(),
            ));
        }

        if payload.notification_type == NotificationType::Custom && payload.message.is_none() {
            return Err(AppError::Validation(
                "message is required for custom notifications".to_string(),
            ));
        }

        let notification = self
            .store
            .create(NewNotification {
                workshop_id,
                booking_id: payload.booking_id,
                notification_type: payload.notification_type,
                channel: payload.channel,
                scheduled_for: payload.scheduled_for,
                message: payload.message,
            })
            .await?;

        info!(
            "Scheduled {} notification {} for booking {}",
            notification.notification_type, notification.id, notification.booking_id
        );

        Ok(notification)
    }

    /// Due pending notifications of one workshop, enriched for rendering.
    /// Read-only; no state changes.
    pub async fn list_pending(
        &self,
        workshop_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<PendingNotification>> {
        self.store.list_pending(workshop_id, as_of).await
    }

    /// Deliver a previously scheduled notification. Exactly one adapter
    /// invocation; the record ends up in a terminal state either way.
    /// Already-terminal records are rejected before any provider contact.
    pub async fn send_scheduled(&self, workshop_id: Uuid, id: Uuid) -> Result<Notification> {
        let notification = self
            .store
            .find_by_id(id)
            .await?
            .filter(|n| n.workshop_id == workshop_id)
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.status.is_terminal() {
            return Err(AppError::AlreadyResolved(format!(
                "Notification {} is already {}",
                id, notification.status
            )));
        }

        let booking = self
            .bookings
            .find_by_id(notification.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        let body = compose_body(&notification, &booking)?;
        let target = resolve_target(&notification.channel, &booking)?;
        let adapter = self.channels.adapter_for(&notification.channel);

        match adapter.deliver(&target, &body).await {
            Ok(delivery) => {
                let resolved = self
                    .store
                    .resolve(
                        id,
                        ResolvedOutcome::Delivered {
                            provider_message_id: delivery.provider_message_id,
                            at: Utc::now(),
                        },
                    )
                    .await?;

                // A lost conditional write means a concurrent caller resolved
                // the record first.
                resolved.ok_or_else(|| {
                    AppError::AlreadyResolved(format!(
                        "Notification {id} was resolved concurrently"
                    ))
                })
            }
            Err(err) => {
                let resolved = self
                    .store
                    .resolve(
                        id,
                        ResolvedOutcome::Failed {
                            error: err.to_string(),
                        },
                    )
                    .await?;

                if resolved.is_none() {
                    warn!("Notification {} failed but was resolved concurrently", id);
                }

                Err(err)
            }
        }
    }

    /// Administrative override for deliveries confirmed out-of-band.
    /// Pending -> Sent with no adapter call.
    pub async fn mark_sent(&self, workshop_id: Uuid, id: Uuid) -> Result<Notification> {
        let notification = self
            .store
            .find_by_id(id)
            .await?
            .filter(|n| n.workshop_id == workshop_id)
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.status.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Cannot mark a {} notification as sent",
                notification.status
            )));
        }

        let resolved = self
            .store
            .resolve(
                id,
                ResolvedOutcome::Delivered {
                    provider_message_id: None,
                    at: Utc::now(),
                },
            )
            .await?;

        resolved.ok_or_else(|| {
            AppError::InvalidTransition(format!("Notification {id} was resolved concurrently"))
        })
    }

    /// Soft delete. Records are never physically removed.
    pub async fn discard(&self, id: Uuid, workshop_id: Uuid) -> Result<()> {
        let affected = self.store.soft_delete(id, workshop_id).await?;

        if affected == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }

    /// Compose-and-deliver with no prior record. Channels are chosen by the
    /// contact fields present; per-channel outcomes are reported back
    /// instead of failing the whole request.
    pub async fn send_adhoc(
        &self,
        payload: SendNotificationRequest,
    ) -> Result<SendNotificationResponse> {
        if payload.phone_number.is_none() && payload.email.is_none() {
            return Err(AppError::Validation(
                "phone_number or email is required".to_string(),
            ));
        }

        let mut sms_result = None;
        let mut email_result = None;
        let mut errors = Vec::new();

        if let Some(phone) = &payload.phone_number {
            match self
                .channels
                .sms
                .deliver(&DeliveryTarget::Phone(phone.clone()), &payload.message)
                .await
            {
                Ok(delivery) => {
                    sms_result =
                        Some(delivery.provider_message_id.unwrap_or_else(|| "sent".to_string()));
                }
                Err(e) => {
                    warn!("Ad-hoc SMS to {} failed: {}", phone, e);
                    errors.push(format!("sms: {e}"));
                }
            }
        }

        if let Some(email) = &payload.email {
            match self
                .channels
                .email
                .deliver(&DeliveryTarget::Email(email.clone()), &payload.message)
                .await
            {
                Ok(delivery) => {
                    email_result =
                        Some(delivery.provider_message_id.unwrap_or_else(|| "sent".to_string()));
                }
                Err(e) => {
                    warn!("Ad-hoc email to {} failed: {}", email, e);
                    errors.push(format!("email: {e}"));
                }
            }
        }

        let success = errors.is_empty();
        Ok(SendNotificationResponse {
            success,
            sms_result,
            email_result,
            error: if success { None } else { Some(errors.join("; ")) },
        })
    }

    pub async fn send_whatsapp(
        &self,
        payload: SendWhatsAppRequest,
    ) -> Result<SendWhatsAppResponse> {
        match self
            .channels
            .whatsapp
            .deliver(
                &DeliveryTarget::Phone(payload.phone_number.clone()),
                &payload.message,
            )
            .await
        {
            Ok(delivery) => Ok(SendWhatsAppResponse {
                success: true,
                message_id: delivery.provider_message_id,
                error: None,
            }),
            Err(e) => {
                warn!("WhatsApp to {} failed: {}", payload.phone_number, e);
                Ok(SendWhatsAppResponse {
                    success: false,
                    message_id: None,
                    error: Some(e.to_string()),
                })
            }
        }
    }
}

/// Message body: an explicit override wins, otherwise a template per type.
fn compose_body(notification: &Notification, booking: &Booking) -> Result<String> {
    if let Some(message) = &notification.message {
        return Ok(message.clone());
    }

    let when = booking.scheduled_at.format("%Y-%m-%d %H:%M");
    match notification.notification_type {
        NotificationType::Reminder => Ok(format!(
            "Hi {}, a reminder: your {} appointment is scheduled for {}.",
            booking.customer_name, booking.service_name, when
        )),
        NotificationType::Confirmation => Ok(format!(
            "Hi {}, your {} appointment on {} is confirmed.",
            booking.customer_name, booking.service_name, when
        )),
        NotificationType::Cancellation => Ok(format!(
            "Hi {}, your {} appointment on {} has been cancelled.",
            booking.customer_name, booking.service_name, when
        )),
        NotificationType::Custom => Err(AppError::Validation(
            "Custom notification has no message body".to_string(),
        )),
    }
}

fn resolve_target(channel: &NotificationChannel, booking: &Booking) -> Result<DeliveryTarget> {
    match channel {
        NotificationChannel::Push => Ok(DeliveryTarget::Push {
            customer_id: booking.customer_id,
        }),
        NotificationChannel::Sms | NotificationChannel::Whatsapp => booking
            .customer_phone
            .clone()
            .map(DeliveryTarget::Phone)
            .ok_or_else(|| {
                AppError::Validation("Booking has no customer phone number".to_string())
            }),
        NotificationChannel::Email => booking
            .customer_email
            .clone()
            .map(DeliveryTarget::Email)
            .ok_or_else(|| AppError::Validation("Booking has no customer email".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ChannelAdapter, Delivery};
    use crate::notification::notification_models::NotificationStatus;
    use crate::workshop::Workshop;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct InMemoryStore {
        rows: Mutex<HashMap<Uuid, Notification>>,
    }

    impl InMemoryStore {
        fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
            }
        }

        fn get(&self, id: Uuid) -> Option<Notification> {
            self.rows.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl NotificationStore for InMemoryStore {
        async fn create(&self, new: NewNotification) -> Result<Notification> {
            let now = Utc::now();
            let notification = Notification {
                id: Uuid::new_v4(),
                workshop_id: new.workshop_id,
                booking_id: new.booking_id,
                notification_type: new.notification_type,
                channel: new.channel,
                message: new.message,
                status: NotificationStatus::Pending,
                scheduled_for: new.scheduled_for,
                sent_at: None,
                provider_message_id: None,
                last_error: None,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            self.rows
                .lock()
                .unwrap()
                .insert(notification.id, notification.clone());
            Ok(notification)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
            Ok(self.get(id).filter(|n| n.deleted_at.is_none()))
        }

        async fn list_pending(
            &self,
            workshop_id: Uuid,
            as_of: DateTime<Utc>,
        ) -> Result<Vec<PendingNotification>> {
            let mut due: Vec<Notification> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|n| {
                    n.workshop_id == workshop_id
                        && n.status == NotificationStatus::Pending
                        && n.scheduled_for <= as_of
                        && n.deleted_at.is_none()
                })
                .cloned()
                .collect();
            due.sort_by_key(|n| n.scheduled_for);

            Ok(due
                .into_iter()
                .map(|n| PendingNotification {
                    id: n.id,
                    notification_type: n.notification_type,
                    channel: n.channel,
                    scheduled_for: n.scheduled_for,
                    booking_id: n.booking_id,
                    customer_name: "Ana".to_string(),
                    customer_phone: Some("+5511999990000".to_string()),
                    customer_email: Some("ana@example.com".to_string()),
                    service_name: "Oil change".to_string(),
                    booking_scheduled_at: n.scheduled_for,
                    workshop_name: "Central Garage".to_string(),
                })
                .collect())
        }

        async fn resolve(
            &self,
            id: Uuid,
            outcome: ResolvedOutcome,
        ) -> Result<Option<Notification>> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.get_mut(&id) else {
                return Ok(None);
            };
            if row.status != NotificationStatus::Pending || row.deleted_at.is_some() {
                return Ok(None);
            }
            match outcome {
                ResolvedOutcome::Delivered {
                    provider_message_id,
                    at,
                } => {
                    row.status = NotificationStatus::Sent;
                    row.sent_at = Some(at);
                    row.provider_message_id = provider_message_id;
                }
                ResolvedOutcome::Failed { error } => {
                    row.status = NotificationStatus::Failed;
                    row.last_error = Some(error);
                }
            }
            row.updated_at = Utc::now();
            Ok(Some(row.clone()))
        }

        async fn soft_delete(&self, id: Uuid, workshop_id: Uuid) -> Result<u64> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(row) if row.workshop_id == workshop_id && row.deleted_at.is_none() => {
                    row.deleted_at = Some(Utc::now());
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    struct StaticBookings {
        booking: Booking,
    }

    #[async_trait]
    impl BookingDirectory for StaticBookings {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
            Ok((self.booking.id == id).then(|| self.booking.clone()))
        }
    }

    struct StaticWorkshops {
        workshop: Workshop,
    }

    #[async_trait]
    impl WorkshopDirectory for StaticWorkshops {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Workshop>> {
            Ok((self.workshop.id == id).then(|| self.workshop.clone()))
        }
    }

    struct FakeAdapter {
        fail_with: Option<String>,
        calls: AtomicUsize,
    }

    impl FakeAdapter {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail_with: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(detail: &str) -> Arc<Self> {
            Arc::new(Self {
                fail_with: Some(detail.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChannelAdapter for FakeAdapter {
        async fn deliver(&self, _target: &DeliveryTarget, _body: &str) -> Result<Delivery> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(detail) => Err(AppError::Provider(detail.clone())),
                None => Ok(Delivery {
                    provider_message_id: Some("prov-123".to_string()),
                }),
            }
        }
    }

    struct Fixture {
        service: NotificationService,
        store: Arc<InMemoryStore>,
        adapter: Arc<FakeAdapter>,
        workshop_id: Uuid,
        booking_id: Uuid,
    }

    fn fixture_with(adapter: Arc<FakeAdapter>) -> Fixture {
        let workshop_id = Uuid::new_v4();
        let booking_id = Uuid::new_v4();
        let now = Utc::now();

        let booking = Booking {
            id: booking_id,
            workshop_id,
            customer_id: Uuid::new_v4(),
            customer_name: "Ana".to_string(),
            customer_phone: Some("+5511999990000".to_string()),
            customer_email: Some("ana@example.com".to_string()),
            service_name: "Oil change".to_string(),
            scheduled_at: now + Duration::days(1),
            created_at: now,
        };
        let workshop = Workshop {
            id: workshop_id,
            name: "Central Garage".to_string(),
            phone: None,
            email: None,
            is_approved: true,
            created_at: now,
        };

        let store = Arc::new(InMemoryStore::new());
        let channels = ChannelSet {
            push: adapter.clone(),
            sms: adapter.clone(),
            whatsapp: adapter.clone(),
            email: adapter.clone(),
        };
        let service = NotificationService::new(
            store.clone(),
            Arc::new(StaticBookings { booking }),
            Arc::new(StaticWorkshops { workshop }),
            channels,
        );

        Fixture {
            service,
            store,
            adapter,
            workshop_id,
            booking_id,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(FakeAdapter::ok())
    }

    fn schedule_request(fx: &Fixture, scheduled_for: DateTime<Utc>) -> ScheduleNotificationRequest {
        ScheduleNotificationRequest {
            booking_id: fx.booking_id,
            notification_type: NotificationType::Reminder,
            channel: NotificationChannel::Sms,
            scheduled_for,
            message: None,
        }
    }

    #[tokio::test]
    async fn test_schedule_creates_pending_record() {
        let fx = fixture();
        let created = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, Utc::now()))
            .await
            .unwrap();

        assert_eq!(created.status, NotificationStatus::Pending);
        assert!(created.sent_at.is_none());
        assert_eq!(fx.adapter.calls(), 0, "scheduling must never send");
    }

    #[tokio::test]
    async fn test_schedule_requires_message_for_custom_type() {
        let fx = fixture();
        let mut request = schedule_request(&fx, Utc::now());
        request.notification_type = NotificationType::Custom;

        let err = fx.service.schedule(fx.workshop_id, request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_schedule_rejects_unknown_workshop() {
        let fx = fixture();
        let err = fx
            .service
            .schedule(Uuid::new_v4(), schedule_request(&fx, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_send_resolves_to_sent_and_second_send_is_rejected() {
        let fx = fixture();
        let created = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, Utc::now()))
            .await
            .unwrap();

        let sent = fx.service.send_scheduled(fx.workshop_id, created.id).await.unwrap();
        assert_eq!(sent.status, NotificationStatus::Sent);
        assert!(sent.sent_at.is_some());
        assert_eq!(sent.provider_message_id.as_deref(), Some("prov-123"));
        assert_eq!(fx.adapter.calls(), 1);

        let err = fx.service.send_scheduled(fx.workshop_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyResolved(_)));
        assert_eq!(fx.adapter.calls(), 1, "terminal records never reach the adapter");

        let stored = fx.store.get(created.id).unwrap();
        assert_eq!(stored.sent_at, sent.sent_at, "sent_at unchanged by the rejected send");
    }

    #[tokio::test]
    async fn test_failed_delivery_is_terminal_with_error_detail() {
        let fx = fixture_with(FakeAdapter::failing("gateway timeout"));
        let scheduled_for = Utc::now() - Duration::minutes(1);
        let created = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, scheduled_for))
            .await
            .unwrap();

        let listed = fx
            .service
            .list_pending(fx.workshop_id, Utc::now())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);

        let err = fx.service.send_scheduled(fx.workshop_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));

        let stored = fx.store.get(created.id).unwrap();
        assert_eq!(stored.status, NotificationStatus::Failed);
        assert!(stored.last_error.is_some());
        assert!(stored.sent_at.is_none());

        let err = fx.service.send_scheduled(fx.workshop_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyResolved(_)));
        assert_eq!(fx.adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_list_pending_filters_by_workshop_and_due_time() {
        let fx = fixture();
        let now = Utc::now();

        let due = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, now - Duration::hours(1)))
            .await
            .unwrap();
        let _future = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, now + Duration::hours(1)))
            .await
            .unwrap();

        // A record owned by another workshop, inserted directly.
        fx.store
            .create(NewNotification {
                workshop_id: Uuid::new_v4(),
                booking_id: fx.booking_id,
                notification_type: NotificationType::Reminder,
                channel: NotificationChannel::Sms,
                scheduled_for: now - Duration::hours(2),
                message: None,
            })
            .await
            .unwrap();

        let listed = fx.service.list_pending(fx.workshop_id, now).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, due.id);
    }

    #[tokio::test]
    async fn test_list_pending_orders_by_scheduled_for() {
        let fx = fixture();
        let now = Utc::now();

        let later = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, now - Duration::minutes(5)))
            .await
            .unwrap();
        let earlier = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, now - Duration::minutes(30)))
            .await
            .unwrap();

        let listed = fx.service.list_pending(fx.workshop_id, now).await.unwrap();
        assert_eq!(
            listed.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![earlier.id, later.id]
        );
    }

    #[tokio::test]
    async fn test_mark_sent_only_from_pending() {
        let fx = fixture();
        let created = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, Utc::now()))
            .await
            .unwrap();

        let marked = fx.service.mark_sent(fx.workshop_id, created.id).await.unwrap();
        assert_eq!(marked.status, NotificationStatus::Sent);
        assert!(marked.sent_at.is_some());
        assert_eq!(fx.adapter.calls(), 0, "mark_sent never touches an adapter");

        let err = fx.service.mark_sent(fx.workshop_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_mark_sent_rejects_failed_records() {
        let fx = fixture_with(FakeAdapter::failing("boom"));
        let created = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, Utc::now()))
            .await
            .unwrap();
        let _ = fx.service.send_scheduled(fx.workshop_id, created.id).await;

        let err = fx.service.mark_sent(fx.workshop_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_discard_soft_deletes_and_hides_record() {
        let fx = fixture();
        let created = fx
            .service
            .schedule(fx.workshop_id, schedule_request(&fx, Utc::now()))
            .await
            .unwrap();

        fx.service.discard(created.id, fx.workshop_id).await.unwrap();

        let err = fx.service.send_scheduled(fx.workshop_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fx.store.get(created.id).unwrap().deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_adhoc_send_requires_a_contact_field() {
        let fx = fixture();
        let err = fx
            .service
            .send_adhoc(SendNotificationRequest {
                phone_number: None,
                email: None,
                message: "hello".to_string(),
                notification_type: NotificationType::Custom,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(fx.adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_adhoc_send_delivers_to_each_supplied_contact() {
        let fx = fixture();
        let response = fx
            .service
            .send_adhoc(SendNotificationRequest {
                phone_number: Some("+5511999990000".to_string()),
                email: Some("ana@example.com".to_string()),
                message: "hello".to_string(),
                notification_type: NotificationType::Custom,
            })
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.sms_result.as_deref(), Some("prov-123"));
        assert_eq!(response.email_result.as_deref(), Some("prov-123"));
        assert!(response.error.is_none());
        assert_eq!(fx.adapter.calls(), 2);
    }

    #[tokio::test]
    async fn test_adhoc_send_reports_provider_failure() {
        let fx = fixture_with(FakeAdapter::failing("number unreachable"));
        let response = fx
            .service
            .send_adhoc(SendNotificationRequest {
                phone_number: Some("+5511999990000".to_string()),
                email: None,
                message: "hello".to_string(),
                notification_type: NotificationType::Custom,
            })
            .await
            .unwrap();

        assert!(!response.success);
        assert!(response.sms_result.is_none());
        assert!(response.error.unwrap().contains("number unreachable"));
    }

    #[tokio::test]
    async fn test_whatsapp_send_returns_provider_message_id() {
        let fx = fixture();
        let response = fx
            .service
            .send_whatsapp(SendWhatsAppRequest {
                phone_number: "+5511999990000".to_string(),
                message: "hello".to_string(),
            })
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.message_id.as_deref(), Some("prov-123"));
    }

    #[tokio::test]
    async fn test_send_without_contact_field_keeps_record_pending() {
        // SMS notification whose booking has no phone: target resolution
        // fails before any adapter call and before any state change.
        let fx = fixture();
        let workshop_id = fx.workshop_id;
        let now = Utc::now();
        let booking = Booking {
            id: fx.booking_id,
            workshop_id,
            customer_id: Uuid::new_v4(),
            customer_name: "Ana".to_string(),
            customer_phone: None,
            customer_email: None,
            service_name: "Oil change".to_string(),
            scheduled_at: now,
            created_at: now,
        };
        let service = NotificationService::new(
            fx.store.clone(),
            Arc::new(StaticBookings { booking }),
            Arc::new(StaticWorkshops {
                workshop: Workshop {
                    id: workshop_id,
                    name: "Central Garage".to_string(),
                    phone: None,
                    email: None,
                    is_approved: true,
                    created_at: now,
                },
            }),
            ChannelSet {
                push: fx.adapter.clone(),
                sms: fx.adapter.clone(),
                whatsapp: fx.adapter.clone(),
                email: fx.adapter.clone(),
            },
        );

        let created = service
            .schedule(workshop_id, schedule_request(&fx, now))
            .await
            .unwrap();
        let err = service.send_scheduled(workshop_id, created.id).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(fx.adapter.calls(), 0);
        assert_eq!(
            fx.store.get(created.id).unwrap().status,
            NotificationStatus::Pending
        );
    }
}

use super::notification_models::{
    Notification, NotificationChannel, NotificationType, PendingNotification,
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub workshop_id: Uuid,
    pub booking_id: Uuid,
    pub notification_type: NotificationType,
    pub channel: NotificationChannel,
    pub scheduled_for: DateTime<Utc>,
    pub message: Option<String>,
}

/// Terminal outcome applied to a pending notification.
#[derive(Debug, Clone)]
pub enum ResolvedOutcome {
    Delivered {
        provider_message_id: Option<String>,
        at: DateTime<Utc>,
    },
    Failed {
        error: String,
    },
}

/// Persistence seam for notification records. Exposes only the operations
/// the lifecycle manager needs; there is no unrestricted update or hard
/// delete.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, new: NewNotification) -> Result<Notification>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>>;

    async fn list_pending(
        &self,
        workshop_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<PendingNotification>>;

    /// Conditional write: applies the outcome only while the record is still
    /// pending. Returns `None` when the row is absent or already terminal,
    /// which serializes concurrent sends against the same id.
    async fn resolve(&self, id: Uuid, outcome: ResolvedOutcome) -> Result<Option<Notification>>;

    async fn soft_delete(&self, id: Uuid, workshop_id: Uuid) -> Result<u64>;
}

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, new: NewNotification) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications
                 (workshop_id, booking_id, notification_type, channel, scheduled_for, message, status)
             VALUES ($1, $2, $3, $4, $5, $6, 'pending')
             RETURNING *",
        )
        .bind(new.workshop_id)
        .bind(new.booking_id)
        .bind(new.notification_type)
        .bind(new.channel)
        .bind(new.scheduled_for)
        .bind(new.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn list_pending(
        &self,
        workshop_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<PendingNotification>> {
        let pending = sqlx::query_as::<_, PendingNotification>(
            "SELECT n.id, n.notification_type, n.channel, n.scheduled_for,
                    b.id AS booking_id, b.customer_name, b.customer_phone,
                    b.customer_email, b.service_name,
                    b.scheduled_at AS booking_scheduled_at,
                    w.name AS workshop_name
             FROM notifications n
             JOIN bookings b ON b.id = n.booking_id
             JOIN workshops w ON w.id = n.workshop_id
             WHERE n.workshop_id = $1
               AND n.status = 'pending'
               AND n.scheduled_for <= $2
               AND n.deleted_at IS NULL
             ORDER BY n.scheduled_for ASC",
        )
        .bind(workshop_id)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        Ok(pending)
    }

    async fn resolve(&self, id: Uuid, outcome: ResolvedOutcome) -> Result<Option<Notification>> {
        let notification = match outcome {
            ResolvedOutcome::Delivered {
                provider_message_id,
                at,
            } => {
                sqlx::query_as::<_, Notification>(
                    "UPDATE notifications
                     SET status = 'sent', sent_at = $2, provider_message_id = $3,
                         updated_at = now()
                     WHERE id = $1 AND status = 'pending' AND deleted_at IS NULL
                     RETURNING *",
                )
                .bind(id)
                .bind(at)
                .bind(provider_message_id)
                .fetch_optional(&self.pool)
                .await?
            }
            ResolvedOutcome::Failed { error } => {
                sqlx::query_as::<_, Notification>(
                    "UPDATE notifications
                     SET status = 'failed', last_error = $2, updated_at = now()
                     WHERE id = $1 AND status = 'pending' AND deleted_at IS NULL
                     RETURNING *",
                )
                .bind(id)
                .bind(error)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(notification)
    }

    async fn soft_delete(&self, id: Uuid, workshop_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND workshop_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(workshop_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

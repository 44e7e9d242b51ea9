use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::notification_dto::{
    NotificationStatusResponse, ScheduleNotificationRequest, ScheduledNotificationResponse,
    SendNotificationRequest, SendNotificationResponse, SendWhatsAppRequest, SendWhatsAppResponse,
};
use super::notification_models::PendingNotification;
use crate::{
    error::{AppError, Result},
    state::AppState,
};

#[derive(Deserialize)]
pub struct PendingFilters {
    as_of: Option<DateTime<Utc>>,
}

/// Schedule a notification for later delivery
#[utoipa::path(
    post,
    path = "/api/notifications/schedule",
    request_body = ScheduleNotificationRequest,
    responses(
        (status = 201, description = "Notification scheduled", body = ScheduledNotificationResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Workshop not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn schedule_notification(
    State(state): State<AppState>,
    Extension(workshop_id): Extension<Uuid>,
    Json(payload): Json<ScheduleNotificationRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let notification = state
        .notification_service
        .schedule(workshop_id, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ScheduledNotificationResponse {
            id: notification.id,
            notification_type: notification.notification_type,
            scheduled_for: notification.scheduled_for,
            status: notification.status,
        }),
    ))
}

/// List due pending notifications for the authenticated workshop
#[utoipa::path(
    get,
    path = "/api/notifications/pending",
    params(
        ("as_of" = Option<String>, Query, description = "Due cutoff, RFC 3339; defaults to now")
    ),
    responses(
        (status = 200, description = "Due pending notifications", body = Vec<PendingNotification>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_pending_notifications(
    State(state): State<AppState>,
    Extension(workshop_id): Extension<Uuid>,
    Query(filters): Query<PendingFilters>,
) -> Result<Json<Vec<PendingNotification>>> {
    let as_of = filters.as_of.unwrap_or_else(Utc::now);
    let pending = state
        .notification_service
        .list_pending(workshop_id, as_of)
        .await?;

    Ok(Json(pending))
}

/// Send an ad-hoc notification to a literal contact
#[utoipa::path(
    post,
    path = "/api/notifications/send",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Per-channel delivery results", body = SendNotificationResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Json(payload): Json<SendNotificationRequest>,
) -> Result<Json<SendNotificationResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.notification_service.send_adhoc(payload).await?;

    Ok(Json(response))
}

/// Deliver a previously scheduled notification
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/send",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification delivered", body = NotificationStatusResponse),
        (status = 404, description = "Notification or booking not found"),
        (status = 409, description = "Notification already resolved"),
        (status = 422, description = "Push target has no active device"),
        (status = 502, description = "Provider failure"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn send_scheduled_notification(
    State(state): State<AppState>,
    Extension(workshop_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationStatusResponse>> {
    let notification = state
        .notification_service
        .send_scheduled(workshop_id, id)
        .await?;

    Ok(Json(NotificationStatusResponse {
        id: notification.id,
        status: notification.status,
        sent_at: notification.sent_at,
        last_error: notification.last_error,
    }))
}

/// Mark a pending notification as sent out-of-band
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/sent",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked sent", body = NotificationStatusResponse),
        (status = 404, description = "Notification not found"),
        (status = 409, description = "Notification is not pending"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_sent(
    State(state): State<AppState>,
    Extension(workshop_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationStatusResponse>> {
    let notification = state
        .notification_service
        .mark_sent(workshop_id, id)
        .await?;

    Ok(Json(NotificationStatusResponse {
        id: notification.id,
        status: notification.status,
        sent_at: notification.sent_at,
        last_error: notification.last_error,
    }))
}

/// Soft-delete a notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification discarded"),
        (status = 404, description = "Notification not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(workshop_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.notification_service.discard(id, workshop_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Send a WhatsApp message
#[utoipa::path(
    post,
    path = "/api/whatsapp/send",
    request_body = SendWhatsAppRequest,
    responses(
        (status = 200, description = "Delivery result", body = SendWhatsAppResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "whatsapp",
    security(("bearer_auth" = []))
)]
pub async fn send_whatsapp_message(
    State(state): State<AppState>,
    Json(payload): Json<SendWhatsAppRequest>,
) -> Result<Json<SendWhatsAppResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.notification_service.send_whatsapp(payload).await?;

    Ok(Json(response))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use super::{device_dto::RegisterDeviceRequest, device_models::DeviceToken};
use crate::{
    device::device_repository::DeviceTokenStore,
    error::{AppError, Result},
    state::AppState,
};

/// Register (or take over) a push device token
#[utoipa::path(
    post,
    path = "/api/devices",
    request_body = RegisterDeviceRequest,
    responses(
        (status = 201, description = "Device token registered", body = DeviceToken),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "devices",
    security(("bearer_auth" = []))
)]
pub async fn register_device(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDeviceRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = state
        .device_repository
        .register(&payload.fcm_token, payload.customer_id, payload.platform)
        .await?;

    Ok((StatusCode::CREATED, Json(token)))
}

/// Deactivate a push device token
#[utoipa::path(
    delete,
    path = "/api/devices/{fcm_token}",
    params(
        ("fcm_token" = String, Path, description = "Registered FCM token")
    ),
    responses(
        (status = 204, description = "Device token deactivated"),
        (status = 404, description = "Token not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "devices",
    security(("bearer_auth" = []))
)]
pub async fn deactivate_device(
    State(state): State<AppState>,
    Path(fcm_token): Path<String>,
) -> Result<StatusCode> {
    let affected = state.device_repository.deactivate(&fcm_token).await?;

    if affected == 0 {
        return Err(AppError::NotFound("Device token not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

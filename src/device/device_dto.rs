use super::device_models::DevicePlatform;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterDeviceRequest {
    #[validate(length(min = 1, max = 4096))]
    pub fcm_token: String,
    pub customer_id: Uuid,
    pub platform: DevicePlatform,
}

use super::device_models::{DevicePlatform, DeviceToken};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Push-target registry. Tokens are unique across the system; registering a
/// token under a new customer deactivates the prior ownership row instead of
/// duplicating it.
#[async_trait]
pub trait DeviceTokenStore: Send + Sync {
    async fn find_active_for_customer(&self, customer_id: Uuid) -> Result<Vec<DeviceToken>>;

    /// Upsert keyed on the token string. When a known token arrives under a
    /// new customer, the existing row is taken over (new owner, re-activated)
    /// so the prior ownership ends without a duplicate row ever existing.
    async fn register(
        &self,
        fcm_token: &str,
        customer_id: Uuid,
        platform: DevicePlatform,
    ) -> Result<DeviceToken>;

    async fn deactivate(&self, fcm_token: &str) -> Result<u64>;
}

#[derive(Clone)]
pub struct DeviceTokenRepository {
    pool: PgPool,
}

impl DeviceTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceTokenStore for DeviceTokenRepository {
    async fn find_active_for_customer(&self, customer_id: Uuid) -> Result<Vec<DeviceToken>> {
        let tokens = sqlx::query_as::<_, DeviceToken>(
            "SELECT * FROM device_tokens
             WHERE customer_id = $1 AND is_active = true
             ORDER BY last_used_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens)
    }

    async fn register(
        &self,
        fcm_token: &str,
        customer_id: Uuid,
        platform: DevicePlatform,
    ) -> Result<DeviceToken> {
        // fcm_token is unique; a re-registration under a new customer takes
        // over the existing row rather than inserting a duplicate.
        let token = sqlx::query_as::<_, DeviceToken>(
            "INSERT INTO device_tokens (fcm_token, customer_id, platform, is_active, last_used_at)
             VALUES ($1, $2, $3, true, now())
             ON CONFLICT (fcm_token) DO UPDATE
             SET customer_id = EXCLUDED.customer_id,
                 platform = EXCLUDED.platform,
                 is_active = true,
                 last_used_at = now()
             RETURNING *",
        )
        .bind(fcm_token)
        .bind(customer_id)
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }

    async fn deactivate(&self, fcm_token: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE device_tokens SET is_active = false WHERE fcm_token = $1")
            .bind(fcm_token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

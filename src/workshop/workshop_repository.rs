use super::workshop_models::Workshop;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only view of the workshop directory consumed by the notification
/// lifecycle. Registration/approval flows live elsewhere.
#[async_trait]
pub trait WorkshopDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Workshop>>;
}

#[derive(Clone)]
pub struct WorkshopRepository {
    pool: PgPool,
}

impl WorkshopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkshopDirectory for WorkshopRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Workshop>> {
        let workshop = sqlx::query_as::<_, Workshop>("SELECT * FROM workshops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(workshop)
    }
}

//! Resource repository implementation.

use sqlx::{PgConnection, PgPool};

use courthub_core::result::AppResult;
use courthub_core::types::id::{ResourceId, ServiceId};
use courthub_entity::resource::Resource;

use crate::error::map_sqlx_error;

/// Repository for bookable resources.
///
/// Results are always ordered by `(created_at, id)`; allocation tie-breaks
/// depend on that fetch order.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enabled resources of a service that support an activity.
    pub async fn find_for_activity(
        &self,
        service_id: ServiceId,
        activity_code: &str,
    ) -> AppResult<Vec<Resource>> {
        sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources \
             WHERE service_id = $1 AND enabled AND $2 = ANY(activities) \
             ORDER BY created_at, id",
        )
        .bind(service_id)
        .bind(activity_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list resources"))
    }

    /// Re-read and row-lock the given resources, keeping only those still
    /// enabled and still supporting the activity.
    pub async fn lock_for_activity(
        conn: &mut PgConnection,
        service_id: ServiceId,
        activity_code: &str,
        resource_ids: &[ResourceId],
    ) -> AppResult<Vec<Resource>> {
        sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources \
             WHERE service_id = $1 AND enabled AND $2 = ANY(activities) AND id = ANY($3) \
             ORDER BY created_at, id \
             FOR UPDATE",
        )
        .bind(service_id)
        .bind(activity_code)
        .bind(resource_ids)
        .fetch_all(conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to lock resources"))
    }
}

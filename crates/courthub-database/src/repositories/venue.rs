//! Venue repository implementation.

use sqlx::PgPool;

use courthub_core::result::AppResult;
use courthub_core::types::id::ServiceId;
use courthub_entity::venue::Venue;

use crate::error::map_sqlx_error;

/// Read access to venue rows.
#[derive(Debug, Clone)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    /// Create a new venue repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a venue by service id.
    pub async fn find_by_id(&self, id: ServiceId) -> AppResult<Option<Venue>> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find venue"))
    }
}

//! Disabled slot repository implementation.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgConnection, PgPool};

use courthub_core::result::AppResult;
use courthub_core::types::id::ResourceId;
use courthub_entity::disabled_slot::DisabledSlot;

use crate::error::map_sqlx_error;

/// Read access to administrator-disabled slots.
#[derive(Debug, Clone)]
pub struct DisabledSlotRepository {
    pool: PgPool,
}

impl DisabledSlotRepository {
    /// Create a new disabled slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All disabled slots of the given resources on a date.
    pub async fn find_on_date(
        &self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
    ) -> AppResult<Vec<DisabledSlot>> {
        sqlx::query_as::<_, DisabledSlot>(
            "SELECT * FROM disabled_slots WHERE resource_id = ANY($1) AND slot_date = $2",
        )
        .bind(resource_ids)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load disabled slots"))
    }

    /// Disabled slots overlapping `[start, end)`, read inside a transaction.
    pub async fn find_overlapping(
        conn: &mut PgConnection,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<Vec<DisabledSlot>> {
        sqlx::query_as::<_, DisabledSlot>(
            "SELECT * FROM disabled_slots \
             WHERE resource_id = ANY($1) AND slot_date = $2 \
             AND start_time < $4 AND end_time > $3",
        )
        .bind(resource_ids)
        .bind(date)
        .bind(start)
        .bind(end)
        .fetch_all(conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load disabled slots"))
    }
}

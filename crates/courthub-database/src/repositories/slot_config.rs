//! Slot configuration and price rule repository implementation.

use sqlx::PgPool;

use courthub_core::result::AppResult;
use courthub_core::types::id::{ResourceId, SlotConfigId};
use courthub_entity::slot::{PriceRule, SlotConfig};

use crate::error::map_sqlx_error;

/// Read access to slot configurations and their price rules.
#[derive(Debug, Clone)]
pub struct SlotConfigRepository {
    pool: PgPool,
}

impl SlotConfigRepository {
    /// Create a new slot config repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enabled configurations for a set of resources.
    pub async fn find_enabled_for_resources(
        &self,
        resource_ids: &[ResourceId],
    ) -> AppResult<Vec<SlotConfig>> {
        sqlx::query_as::<_, SlotConfig>(
            "SELECT * FROM slot_configs WHERE resource_id = ANY($1) AND enabled",
        )
        .bind(resource_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load slot configs"))
    }

    /// Price rules of a configuration in declaration order.
    pub async fn find_price_rules(&self, slot_config_id: SlotConfigId) -> AppResult<Vec<PriceRule>> {
        sqlx::query_as::<_, PriceRule>(
            "SELECT * FROM price_rules WHERE slot_config_id = $1 ORDER BY created_at, id",
        )
        .bind(slot_config_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load price rules"))
    }
}

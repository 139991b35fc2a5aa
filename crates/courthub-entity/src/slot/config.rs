//! Slot configuration entity model.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courthub_core::types::id::{ResourceId, SlotConfigId};

/// Opening hours, slot width, and base price for one resource.
///
/// Invariant enforced at generation time: `opening_time < closing_time`
/// and `slot_duration_minutes > 0`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SlotConfig {
    /// Unique configuration identifier.
    pub id: SlotConfigId,
    /// The configured resource.
    pub resource_id: ResourceId,
    /// Time the first slot starts.
    pub opening_time: NaiveTime,
    /// Time no slot may extend past.
    pub closing_time: NaiveTime,
    /// Width of each slot in minutes.
    pub slot_duration_minutes: i32,
    /// Price of a slot before price rules apply.
    pub base_price: Decimal,
    /// Whether this configuration is active.
    pub enabled: bool,
    /// When the configuration was last updated.
    pub updated_at: DateTime<Utc>,
}

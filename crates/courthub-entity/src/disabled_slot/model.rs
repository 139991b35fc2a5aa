//! Disabled slot entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courthub_core::types::id::{DisabledSlotId, ResourceId, UserId};

use crate::slot::TimeRange;

/// A resource time range withdrawn from sale by an administrator.
///
/// Always treated as occupying its range, like a locking booking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DisabledSlot {
    /// Unique identifier.
    pub id: DisabledSlotId,
    /// The affected resource.
    pub resource_id: ResourceId,
    /// Affected day.
    pub slot_date: NaiveDate,
    /// Range start.
    pub start_time: NaiveTime,
    /// Range end.
    pub end_time: NaiveTime,
    /// Why the slot was disabled.
    pub reason: Option<String>,
    /// Administrator who disabled it.
    pub created_by: Option<UserId>,
    /// When it was disabled.
    pub created_at: DateTime<Utc>,
}

impl DisabledSlot {
    /// The withdrawn time range.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

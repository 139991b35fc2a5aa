//! Generated slot value type.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::range::TimeRange;

/// One fixed-width slot derived from a [`SlotConfig`](super::SlotConfig).
///
/// Never persisted; regenerated on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSlot {
    /// Slot start.
    pub start_time: NaiveTime,
    /// Slot end.
    pub end_time: NaiveTime,
    /// Slot width in minutes.
    pub duration_minutes: i32,
    /// Base price carried over from the slot configuration.
    pub base_price: Decimal,
}

impl GeneratedSlot {
    /// The slot as a time range.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

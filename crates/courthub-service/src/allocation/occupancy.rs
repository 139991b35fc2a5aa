//! Busy intervals per resource.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use courthub_core::types::id::ResourceId;
use courthub_entity::booking::Booking;
use courthub_entity::disabled_slot::DisabledSlot;
use courthub_entity::slot::TimeRange;

/// Which ranges of which resources are taken.
#[derive(Debug, Clone, Default)]
pub struct OccupancyMap {
    busy: HashMap<ResourceId, Vec<TimeRange>>,
}

impl OccupancyMap {
    /// Build from bookings and disabled slots.
    ///
    /// Only bookings that [block](Booking::blocks) at `now` are counted;
    /// disabled slots always count.
    pub fn from_parts(bookings: &[Booking], disabled: &[DisabledSlot], now: DateTime<Utc>) -> Self {
        let mut map = Self::default();
        for booking in bookings.iter().filter(|b| b.blocks(now)) {
            if let Some(resource_id) = booking.resource_id {
                map.mark(resource_id, booking.range());
            }
        }
        for slot in disabled {
            map.mark(slot.resource_id, slot.range());
        }
        map
    }

    /// Record a busy range.
    pub fn mark(&mut self, resource_id: ResourceId, range: TimeRange) {
        self.busy.entry(resource_id).or_default().push(range);
    }

    /// Whether the resource is free for the whole range.
    pub fn is_free(&self, resource_id: ResourceId, range: &TimeRange) -> bool {
        self.busy
            .get(&resource_id)
            .is_none_or(|ranges| ranges.iter().all(|busy| !busy.overlaps(range)))
    }

    /// Whether the resource is free for every range.
    pub fn is_free_for_all(&self, resource_id: ResourceId, ranges: &[TimeRange]) -> bool {
        ranges.iter().all(|r| self.is_free(resource_id, r))
    }

    /// How many of `resource_ids` are busy at some point in `range`.
    pub fn busy_count(&self, resource_ids: &[ResourceId], range: &TimeRange) -> usize {
        resource_ids
            .iter()
            .filter(|id| !self.is_free(**id, range))
            .count()
    }
}

//! Resource selection by tier priority, with per-slot split planning.
//!
//! Pure functions over a tier partition and an occupancy map. Exclusive
//! resources are always tried before multi-activity ones; within a tier the
//! fetch order decides.

use serde::Serialize;
use tracing::debug;

use courthub_core::types::id::ResourceId;
use courthub_entity::slot::TimeRange;

use super::occupancy::OccupancyMap;
use crate::pool::TieredResources;

/// One sub-slot of a split booking and the resource serving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitAssignment {
    /// The sub-slot.
    pub slot: TimeRange,
    /// The first free resource for it.
    pub resource_id: ResourceId,
}

/// How many pooled resources are free for one sub-slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotCoverage {
    /// The sub-slot.
    pub slot: TimeRange,
    /// Free resources for it.
    pub available_count: usize,
}

/// The allocation decision for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationPlan {
    /// One resource covers every sub-slot.
    Single(ResourceId),
    /// Each sub-slot goes to its own first free resource.
    Split(Vec<SplitAssignment>),
    /// No single resource fits, but a split would; the caller did not
    /// allow splitting.
    PartialAvailable(Vec<SlotCoverage>),
    /// Some sub-slot has no free resource at all.
    Unavailable,
}

/// The first resource, in priority order, free for every sub-slot.
pub fn find_single(
    tiers: &TieredResources,
    slots: &[TimeRange],
    occupancy: &OccupancyMap,
) -> Option<ResourceId> {
    tiers
        .in_priority_order()
        .find(|id| occupancy.is_free_for_all(*id, slots))
}

/// Assign every sub-slot its first free resource, or `None` if any sub-slot
/// has none.
pub fn plan_split(
    tiers: &TieredResources,
    slots: &[TimeRange],
    occupancy: &OccupancyMap,
) -> Option<Vec<SplitAssignment>> {
    slots
        .iter()
        .map(|slot| {
            tiers
                .in_priority_order()
                .find(|id| occupancy.is_free(*id, slot))
                .map(|resource_id| SplitAssignment {
                    slot: *slot,
                    resource_id,
                })
        })
        .collect()
}

/// Whether every sub-slot is served by some pooled resource.
pub fn can_fulfill_with_split(
    tiers: &TieredResources,
    slots: &[TimeRange],
    occupancy: &OccupancyMap,
) -> bool {
    slots
        .iter()
        .all(|slot| tiers.in_priority_order().any(|id| occupancy.is_free(id, slot)))
}

/// Decide how a selection is served.
pub fn plan_allocation(
    tiers: &TieredResources,
    slots: &[TimeRange],
    occupancy: &OccupancyMap,
    allow_split: bool,
) -> AllocationPlan {
    if let Some(resource_id) = find_single(tiers, slots, occupancy) {
        debug!(resource_id = %resource_id, "Single resource covers selection");
        return AllocationPlan::Single(resource_id);
    }

    if allow_split {
        return match plan_split(tiers, slots, occupancy) {
            Some(assignments) => {
                debug!(parts = assignments.len(), "Selection split across resources");
                AllocationPlan::Split(assignments)
            }
            None => AllocationPlan::Unavailable,
        };
    }

    if can_fulfill_with_split(tiers, slots, occupancy) {
        let ids: Vec<ResourceId> = tiers.in_priority_order().collect();
        let coverage = slots
            .iter()
            .map(|slot| SlotCoverage {
                slot: *slot,
                available_count: ids.len() - occupancy.busy_count(&ids, slot),
            })
            .collect();
        return AllocationPlan::PartialAvailable(coverage);
    }

    AllocationPlan::Unavailable
}

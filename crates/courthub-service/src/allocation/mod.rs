//! Slot key validation and resource allocation planning.

pub mod engine;
pub mod occupancy;
pub mod request;

pub use engine::{AllocationPlan, SlotCoverage, SplitAssignment, plan_allocation};
pub use occupancy::OccupancyMap;
pub use request::{SlotSelection, validate_selection};

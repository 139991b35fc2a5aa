//! Slot availability quoting.

pub mod service;
pub mod timezone;

pub use service::{AvailabilityService, QuotedSlot};
pub use timezone::VenueClock;

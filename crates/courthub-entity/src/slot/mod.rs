//! Slot configuration, price rule, and generated slot value types.

pub mod config;
pub mod generated;
pub mod price_rule;
pub mod range;

pub use config::SlotConfig;
pub use generated::GeneratedSlot;
pub use price_rule::{DayType, PriceRule};
pub use range::TimeRange;

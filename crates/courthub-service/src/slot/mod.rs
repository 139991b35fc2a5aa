//! Slot generation and pricing.

pub mod generator;
pub mod pricing;

pub use generator::{SlotIter, generate_slots};
pub use pricing::{PriceSheet, evaluate_price};

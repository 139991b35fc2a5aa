//! In-process domain event fan-out.

pub mod bus;

pub use bus::{EventBus, publish_quietly};

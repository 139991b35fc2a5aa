//! Price-homogeneous resource pools and their allocation tiers.

pub mod builder;
pub mod tier;

pub use builder::{PoolBuilder, ResourcePool, select_pool};
pub use tier::TieredResources;

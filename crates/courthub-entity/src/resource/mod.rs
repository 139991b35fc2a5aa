//! Bookable resource entities.

pub mod model;
pub mod tier;

pub use model::Resource;
pub use tier::ResourceTier;

//! Venue service entities.

pub mod model;

pub use model::Venue;

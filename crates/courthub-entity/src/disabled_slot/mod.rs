//! Administrator-disabled slots.

pub mod model;

pub use model::DisabledSlot;

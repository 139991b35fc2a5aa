//! Core type definitions used across the CourtHub workspace.

pub mod id;
pub mod money;

pub use id::*;
pub use money::round_money;

//! # courthub-core
//!
//! Core crate for CourtHub. Contains configuration schemas, typed
//! identifiers, domain events, the event publisher seam, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other CourtHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;

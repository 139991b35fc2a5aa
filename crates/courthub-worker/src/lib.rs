//! Scheduled background tasks for CourtHub.
//!
//! This crate provides:
//! - A cron scheduler driving periodic maintenance
//! - The soft-lock expiry sweep

pub mod scheduler;
pub mod sweep;

pub use scheduler::CronScheduler;
pub use sweep::LockExpirySweep;

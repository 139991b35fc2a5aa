//! # courthub-entity
//!
//! Domain entity models for CourtHub. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`; the status enums map onto PostgreSQL enum types.

pub mod booking;
pub mod disabled_slot;
pub mod resource;
pub mod slot;
pub mod venue;

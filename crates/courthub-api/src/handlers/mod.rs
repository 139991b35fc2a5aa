//! HTTP request handlers.

pub mod availability;
pub mod booking;
pub mod health;

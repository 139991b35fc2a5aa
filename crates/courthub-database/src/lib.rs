//! # courthub-database
//!
//! PostgreSQL connection management, repositories, and the storage traits
//! the booking engine runs against. Two store backends are provided:
//! [`PgStore`] for production and [`MemoryStore`] for tests and local runs.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{
    BookingStore, BookingTransaction, CatalogStore, MemoryStore, Occupancy, PgStore,
};

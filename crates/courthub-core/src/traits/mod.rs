//! Core traits defined in `courthub-core` and implemented by other crates.

pub mod event;

pub use event::EventPublisher;

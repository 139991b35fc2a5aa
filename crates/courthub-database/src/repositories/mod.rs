//! Repository implementations for CourtHub entities.
//!
//! Pool-backed methods serve unlocked reads. Associated functions taking a
//! connection run inside a caller-owned transaction and take row locks.

pub mod booking;
pub mod disabled_slot;
pub mod resource;
pub mod slot_config;
pub mod venue;

pub use booking::BookingRepository;
pub use disabled_slot::DisabledSlotRepository;
pub use resource::ResourceRepository;
pub use slot_config::SlotConfigRepository;
pub use venue::VenueRepository;

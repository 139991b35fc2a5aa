//! # courthub-service
//!
//! Business logic for CourtHub: slot generation and pricing, resource
//! pooling, signed slot keys, availability quoting, allocation, and the
//! booking transactor.
//!
//! Services take their stores and collaborators as `Arc` trait objects at
//! construction time. Every request-scoped call receives an explicit
//! [`RequestContext`].

pub mod allocation;
pub mod availability;
pub mod booking;
pub mod context;
pub mod events;
pub mod pool;
pub mod slot;
pub mod slot_key;

#[cfg(test)]
mod testing;

pub use availability::{AvailabilityService, QuotedSlot, VenueClock};
pub use booking::{
    BookingLifecycleService, BookingOutcome, BookingService, CancelRequest, CreateBookingRequest,
    SoftLockOutcome, SoftLockRequest, SoftLockService,
};
pub use context::{CallerRole, RequestContext};
pub use events::EventBus;
pub use pool::{PoolBuilder, ResourcePool};
pub use slot_key::SlotKeyCodec;

//! Domain events emitted by CourtHub operations.
//!
//! Events are handed to an [`EventPublisher`](crate::traits::EventPublisher)
//! after the owning transaction commits and are consumed by the
//! notification and refund collaborators.

pub mod booking;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::id::UserId;

pub use booking::BookingEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<UserId>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A booking-related event.
    Booking(BookingEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<UserId>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Shorthand for wrapping a booking event.
    pub fn booking(actor_id: Option<UserId>, event: BookingEvent) -> Self {
        Self::new(actor_id, EventPayload::Booking(event))
    }
}

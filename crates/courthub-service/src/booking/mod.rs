//! Booking creation, soft locks, and lifecycle transitions.

pub mod charge;
pub mod lifecycle;
pub mod reference;
pub mod service;
pub mod soft_lock;

pub use charge::Charge;
pub use lifecycle::{BookingLifecycleService, CancelRequest};
pub use reference::generate_reference;
pub use service::{BookingOutcome, BookingService, CreateBookingRequest};
pub use soft_lock::{SoftLockOutcome, SoftLockRequest, SoftLockService};

use courthub_core::events::{BookingEvent, DomainEvent};
use courthub_entity::booking::Booking;

use crate::context::RequestContext;

pub(crate) fn created_event(ctx: &RequestContext, booking: &Booking) -> DomainEvent {
    DomainEvent::booking(
        ctx.user_id,
        BookingEvent::Created {
            booking_id: booking.id,
            reference: booking.reference.clone(),
            user_id: booking.user_id,
            service_id: booking.service_id,
            resource_id: booking.resource_id,
            activity_code: booking.activity_code.clone(),
            date: booking.booking_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            amount: booking.total_amount,
            status: booking.status.to_string(),
        },
    )
}

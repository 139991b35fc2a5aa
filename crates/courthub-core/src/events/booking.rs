//! Booking lifecycle domain events.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{BookingId, ResourceId, ServiceId, UserId};

/// Events related to booking creation and state transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BookingEvent {
    /// A booking row was created (online, manual, soft-locked, or split child).
    Created {
        /// The booking ID.
        booking_id: BookingId,
        /// Human-readable reference code.
        reference: String,
        /// The booking user, if any.
        user_id: Option<UserId>,
        /// The owning service.
        service_id: ServiceId,
        /// The allocated resource.
        resource_id: Option<ResourceId>,
        /// The booked activity.
        activity_code: String,
        /// The booked date.
        date: NaiveDate,
        /// Range start.
        start_time: NaiveTime,
        /// Range end.
        end_time: NaiveTime,
        /// Total amount charged.
        amount: Decimal,
        /// Status at creation.
        status: String,
    },
    /// A booking was confirmed.
    Confirmed {
        /// The booking ID.
        booking_id: BookingId,
        /// Human-readable reference code.
        reference: String,
    },
    /// A booking was cancelled; refund processing keys off this event.
    Cancelled {
        /// The booking ID.
        booking_id: BookingId,
        /// Human-readable reference code.
        reference: String,
        /// Who cancelled it.
        cancelled_by: Option<UserId>,
        /// Amount already collected online and eligible for refund.
        refundable_amount: Decimal,
        /// Free-form cancellation reason.
        reason: Option<String>,
    },
    /// A soft lock ran out before payment completed.
    Expired {
        /// The booking ID.
        booking_id: BookingId,
        /// Human-readable reference code.
        reference: String,
    },
}

//! Booking entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use courthub_core::types::id::{BookingId, ResourceId, ServiceId, UserId};

use super::status::{BookingStatus, PaymentMode, PaymentProgress};
use crate::slot::TimeRange;

/// A reservation of one resource for a contiguous time range.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Human-facing reference code (`CH-XXXXXXXX`).
    pub reference: String,
    /// Allocated resource.
    pub resource_id: Option<ResourceId>,
    /// Booking owner; `None` for manual admin bookings.
    pub user_id: Option<UserId>,
    /// Owning service.
    pub service_id: ServiceId,
    /// Activity code the resource was booked for.
    pub activity_code: String,
    /// Day of play.
    pub booking_date: NaiveDate,
    /// Range start.
    pub start_time: NaiveTime,
    /// Range end.
    pub end_time: NaiveTime,
    /// Total price including the platform fee.
    pub total_amount: Decimal,
    /// Advance collected online.
    pub online_amount: Decimal,
    /// Remainder due at the venue.
    pub venue_amount: Decimal,
    /// Platform fee included in the total.
    pub platform_fee: Decimal,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment progress.
    pub payment_progress: PaymentProgress,
    /// Payment mode.
    pub payment_mode: PaymentMode,
    /// Client-supplied idempotency key.
    pub idempotency_key: Option<String>,
    /// Key of the split request this child belongs to.
    pub parent_idempotency_key: Option<String>,
    /// Client request id of a soft-lock booking.
    pub client_request_id: Option<String>,
    /// Shared by all children of one split booking.
    pub split_group_id: Option<Uuid>,
    /// Soft-lock deadline.
    pub lock_expires_at: Option<DateTime<Utc>>,
    /// Free-text cancellation reason.
    pub cancellation_reason: Option<String>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The booked time range.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether this booking holds its resource regardless of time.
    ///
    /// Confirmed and completed bookings always lock. Pending and
    /// awaiting-confirmation bookings lock once payment has started.
    pub fn is_locking(&self) -> bool {
        match self.status {
            BookingStatus::Confirmed | BookingStatus::Completed => true,
            BookingStatus::Pending | BookingStatus::AwaitingConfirmation => {
                self.payment_progress.has_started()
            }
            _ => false,
        }
    }

    /// Whether this is a soft lock that has not yet lapsed at `now`.
    pub fn holds_soft_lock(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::PaymentPending
            && self.lock_expires_at.is_some_and(|at| at > now)
    }

    /// Whether this booking makes its resource unavailable at `now`.
    pub fn blocks(&self, now: DateTime<Utc>) -> bool {
        self.is_locking() || self.holds_soft_lock(now)
    }

    /// Seconds left on the soft lock, clamped at zero.
    pub fn lock_seconds_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.lock_expires_at
            .map(|at| (at - now).num_seconds().max(0))
    }

    /// Whether `user_id` owns this booking.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Data required to insert a booking row.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Human-facing reference code.
    pub reference: String,
    /// Allocated resource.
    pub resource_id: ResourceId,
    /// Booking owner.
    pub user_id: Option<UserId>,
    /// Owning service.
    pub service_id: ServiceId,
    /// Activity code.
    pub activity_code: String,
    /// Day of play.
    pub booking_date: NaiveDate,
    /// Range start.
    pub start_time: NaiveTime,
    /// Range end.
    pub end_time: NaiveTime,
    /// Total price including the platform fee.
    pub total_amount: Decimal,
    /// Advance collected online.
    pub online_amount: Decimal,
    /// Remainder due at the venue.
    pub venue_amount: Decimal,
    /// Platform fee.
    pub platform_fee: Decimal,
    /// Initial status.
    pub status: BookingStatus,
    /// Initial payment progress.
    pub payment_progress: PaymentProgress,
    /// Payment mode.
    pub payment_mode: PaymentMode,
    /// Idempotency key.
    pub idempotency_key: Option<String>,
    /// Parent key for split children.
    pub parent_idempotency_key: Option<String>,
    /// Soft-lock client request id.
    pub client_request_id: Option<String>,
    /// Split group for split children.
    pub split_group_id: Option<Uuid>,
    /// Soft-lock deadline.
    pub lock_expires_at: Option<DateTime<Utc>>,
}

impl NewBooking {
    /// Materialize the row as it will be stored.
    pub fn into_booking(self, now: DateTime<Utc>) -> Booking {
        Booking {
            id: BookingId::new(),
            reference: self.reference,
            resource_id: Some(self.resource_id),
            user_id: self.user_id,
            service_id: self.service_id,
            activity_code: self.activity_code,
            booking_date: self.booking_date,
            start_time: self.start_time,
            end_time: self.end_time,
            total_amount: self.total_amount,
            online_amount: self.online_amount,
            venue_amount: self.venue_amount,
            platform_fee: self.platform_fee,
            status: self.status,
            payment_progress: self.payment_progress,
            payment_mode: self.payment_mode,
            idempotency_key: self.idempotency_key,
            parent_idempotency_key: self.parent_idempotency_key,
            client_request_id: self.client_request_id,
            split_group_id: self.split_group_id,
            lock_expires_at: self.lock_expires_at,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn booking(status: BookingStatus, progress: PaymentProgress) -> Booking {
        NewBooking {
            reference: "CH-TEST0001".into(),
            resource_id: ResourceId::new(),
            user_id: Some(UserId::new()),
            service_id: ServiceId::new(),
            activity_code: "CRICKET".into(),
            booking_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            total_amount: dec!(500.00),
            online_amount: dec!(500.00),
            venue_amount: dec!(0.00),
            platform_fee: dec!(0.00),
            status,
            payment_progress: progress,
            payment_mode: PaymentMode::Online,
            idempotency_key: None,
            parent_idempotency_key: None,
            client_request_id: None,
            split_group_id: None,
            lock_expires_at: None,
        }
        .into_booking(Utc::now())
    }

    #[test]
    fn test_pending_locks_only_after_payment_starts() {
        assert!(!booking(BookingStatus::Pending, PaymentProgress::NotStarted).is_locking());
        assert!(booking(BookingStatus::Pending, PaymentProgress::InProgress).is_locking());
        assert!(
            booking(BookingStatus::AwaitingConfirmation, PaymentProgress::Success).is_locking()
        );
        assert!(booking(BookingStatus::Confirmed, PaymentProgress::NotStarted).is_locking());
        assert!(!booking(BookingStatus::Cancelled, PaymentProgress::Success).is_locking());
    }

    #[test]
    fn test_soft_lock_blocks_until_expiry() {
        let now = Utc::now();
        let mut held = booking(BookingStatus::PaymentPending, PaymentProgress::NotStarted);
        held.lock_expires_at = Some(now + Duration::minutes(5));
        assert!(held.blocks(now));
        assert_eq!(held.lock_seconds_remaining(now), Some(300));
        assert!(!held.blocks(now + Duration::minutes(5)));
        assert_eq!(held.lock_seconds_remaining(now + Duration::minutes(6)), Some(0));
    }
}

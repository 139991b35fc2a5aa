//! Response DTOs.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courthub_core::types::id::{BookingId, ResourceId, ServiceId, UserId};
use courthub_entity::booking::{Booking, BookingStatus, PaymentMode, PaymentProgress};
use courthub_service::BookingOutcome;
use courthub_service::allocation::SlotCoverage;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Database reachability, when a database is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Booking as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: BookingId,
    pub reference: String,
    pub resource_id: Option<ResourceId>,
    pub user_id: Option<UserId>,
    pub service_id: ServiceId,
    pub activity_code: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_amount: Decimal,
    pub online_amount: Decimal,
    pub venue_amount: Decimal,
    pub platform_fee: Decimal,
    pub status: BookingStatus,
    pub payment_progress: PaymentProgress,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_group_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_expires_at: Option<DateTime<Utc>>,
    /// Seconds until the soft lock lapses, clamped at zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_seconds_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingView {
    /// Render a booking as seen at `now`.
    pub fn at(booking: Booking, now: DateTime<Utc>) -> Self {
        let lock_seconds_remaining = match booking.status {
            BookingStatus::PaymentPending => booking.lock_seconds_remaining(now),
            _ => None,
        };
        Self {
            id: booking.id,
            reference: booking.reference,
            resource_id: booking.resource_id,
            user_id: booking.user_id,
            service_id: booking.service_id,
            activity_code: booking.activity_code,
            booking_date: booking.booking_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            total_amount: booking.total_amount,
            online_amount: booking.online_amount,
            venue_amount: booking.venue_amount,
            platform_fee: booking.platform_fee,
            status: booking.status,
            payment_progress: booking.payment_progress,
            payment_mode: booking.payment_mode,
            split_group_id: booking.split_group_id,
            lock_expires_at: booking.lock_expires_at,
            lock_seconds_remaining,
            cancellation_reason: booking.cancellation_reason,
            created_at: booking.created_at,
        }
    }
}

/// Result of `POST /api/bookings`, tagged by `result`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingResultView {
    /// One booking covers the whole range.
    Booked {
        booking: BookingView,
        replayed: bool,
    },
    /// One booking per sub-slot.
    Split {
        split_group_id: Uuid,
        bookings: Vec<BookingView>,
        replayed: bool,
    },
    /// Nothing booked; retry with `allow_split` to accept a split.
    PartialAvailable {
        slots: Vec<SlotCoverage>,
        message: String,
    },
}

impl BookingResultView {
    /// Render an outcome as seen at `now`.
    pub fn at(outcome: BookingOutcome, now: DateTime<Utc>) -> Self {
        match outcome {
            BookingOutcome::Single { booking, replayed } => Self::Booked {
                booking: BookingView::at(booking, now),
                replayed,
            },
            BookingOutcome::Split {
                split_group_id,
                bookings,
                replayed,
            } => Self::Split {
                split_group_id,
                bookings: bookings.into_iter().map(|b| BookingView::at(b, now)).collect(),
                replayed,
            },
            BookingOutcome::PartialAvailable { slots } => Self::PartialAvailable {
                slots,
                message: "No single resource is free for the whole range; the slots can be booked separately"
                    .to_string(),
            },
        }
    }

    /// Whether this response created new rows.
    pub fn is_new(&self) -> bool {
        matches!(
            self,
            Self::Booked { replayed: false, .. } | Self::Split { replayed: false, .. }
        )
    }
}

/// Result of `POST /api/bookings/soft-lock`.
#[derive(Debug, Clone, Serialize)]
pub struct SoftLockView {
    pub booking: BookingView,
    pub resumed: bool,
}

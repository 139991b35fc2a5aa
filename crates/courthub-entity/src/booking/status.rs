//! Booking status, payment progress, and payment mode enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created through the online flow, awaiting payment.
    Pending,
    /// Paid, waiting for the venue to confirm.
    AwaitingConfirmation,
    /// Soft-locked while the customer completes payment.
    PaymentPending,
    /// Confirmed and holding its resource.
    Confirmed,
    /// Played.
    Completed,
    /// Cancelled by an administrator.
    Cancelled,
    /// Cancelled by the booking owner.
    CancelledByUser,
    /// Soft lock lapsed before payment completed.
    Expired,
}

impl BookingStatus {
    /// Check if the booking is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::CancelledByUser | Self::Expired
        )
    }

    /// Check whether moving to `next` is a permitted transition.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match self {
            Pending => matches!(next, Confirmed | Cancelled | CancelledByUser | Expired),
            PaymentPending => matches!(next, Confirmed | Cancelled | CancelledByUser | Expired),
            AwaitingConfirmation => matches!(next, Confirmed | Cancelled | CancelledByUser),
            Confirmed => matches!(next, Completed | Cancelled | CancelledByUser),
            Completed | Cancelled | CancelledByUser | Expired => false,
        }
    }

    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            Self::PaymentPending => "PAYMENT_PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::CancelledByUser => "CANCELLED_BY_USER",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of the payment attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_progress", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProgress {
    /// No payment attempt yet.
    NotStarted,
    /// The customer is at the payment gateway.
    InProgress,
    /// Payment captured.
    Success,
    /// Payment attempt failed.
    Failed,
}

impl PaymentProgress {
    /// Whether a payment has started or finished.
    pub fn has_started(&self) -> bool {
        matches!(self, Self::InProgress | Self::Success)
    }

    /// Return the progress as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PaymentProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_mode", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Advance collected online, remainder at the venue.
    #[default]
    Online,
    /// Everything paid at the venue.
    Offline,
}

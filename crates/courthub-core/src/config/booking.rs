//! Booking engine configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fees, payment split, and soft-lock settings for the booking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Flat platform fee added to every created booking (and to every
    /// child of a split booking).
    #[serde(default = "default_platform_fee")]
    pub platform_fee: Decimal,
    /// Share of the total collected online in advance, in percent (0–100).
    /// The remainder is due at the venue.
    #[serde(default = "default_advance_percent")]
    pub advance_percent: Decimal,
    /// How long a soft-locked (PAYMENT_PENDING) booking holds its resource.
    #[serde(default = "default_soft_lock_minutes")]
    pub soft_lock_minutes: i64,
    /// IANA time zone used when a venue does not declare its own.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    /// Maximum number of slot keys accepted in one booking request.
    #[serde(default = "default_max_slots")]
    pub max_slots_per_booking: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            platform_fee: default_platform_fee(),
            advance_percent: default_advance_percent(),
            soft_lock_minutes: default_soft_lock_minutes(),
            default_timezone: default_timezone(),
            max_slots_per_booking: default_max_slots(),
        }
    }
}

fn default_platform_fee() -> Decimal {
    Decimal::ZERO
}

fn default_advance_percent() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_soft_lock_minutes() -> i64 {
    10
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_max_slots() -> usize {
    16
}

//! Amount breakdown of a booking.

use rust_decimal::Decimal;

use courthub_core::types::round_money;
use courthub_entity::booking::PaymentMode;

/// What a booking costs and how the total is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charge {
    /// Slot prices plus platform fee.
    pub total: Decimal,
    /// Advance collected online.
    pub online: Decimal,
    /// Remainder due at the venue.
    pub venue: Decimal,
    /// Platform fee included in the total.
    pub platform_fee: Decimal,
}

impl Charge {
    /// `online = round2(total * advance_percent / 100)`, `venue = total - online`.
    /// Offline payment collects nothing online.
    pub fn compute(
        subtotal: Decimal,
        platform_fee: Decimal,
        advance_percent: Decimal,
        mode: PaymentMode,
    ) -> Self {
        let total = round_money(subtotal + platform_fee);
        let online = match mode {
            PaymentMode::Online => {
                let percent = advance_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
                round_money(total * percent / Decimal::ONE_HUNDRED)
            }
            PaymentMode::Offline => round_money(Decimal::ZERO),
        };
        Self {
            total,
            online,
            venue: total - online,
            platform_fee: round_money(platform_fee),
        }
    }
}

//! Monetary rounding shared by pricing and payment splitting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to two decimal places, midpoint away from zero.
///
/// The result always carries a scale of two so amounts serialize as
/// `"1200.00"` regardless of how they were computed.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

//! Fixed-width slot generation from a slot configuration.

use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;

use courthub_core::error::AppError;
use courthub_entity::slot::{GeneratedSlot, SlotConfig};

/// Lazily yields the slots of one day in start order.
///
/// A trailing remainder shorter than the slot width is dropped, and no
/// slot ever wraps past midnight.
#[derive(Debug, Clone)]
pub struct SlotIter {
    next_start: Option<NaiveTime>,
    closing: NaiveTime,
    step: Duration,
    duration_minutes: i32,
    base_price: Decimal,
}

impl SlotIter {
    /// Validate the inputs and build the iterator.
    pub fn new(
        opening: NaiveTime,
        closing: NaiveTime,
        duration_minutes: i32,
        base_price: Decimal,
    ) -> Result<Self, AppError> {
        if duration_minutes <= 0 {
            return Err(AppError::configuration(format!(
                "Slot duration must be positive, got {duration_minutes} minutes"
            )));
        }
        if opening >= closing {
            return Err(AppError::configuration(format!(
                "Opening time {opening} must be before closing time {closing}"
            )));
        }
        Ok(Self {
            next_start: Some(opening),
            closing,
            step: Duration::minutes(i64::from(duration_minutes)),
            duration_minutes,
            base_price,
        })
    }
}

impl Iterator for SlotIter {
    type Item = GeneratedSlot;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        let (end, wrapped) = start.overflowing_add_signed(self.step);
        if wrapped != 0 || end > self.closing {
            self.next_start = None;
            return None;
        }
        self.next_start = Some(end);
        Some(GeneratedSlot {
            start_time: start,
            end_time: end,
            duration_minutes: self.duration_minutes,
            base_price: self.base_price,
        })
    }
}

/// Slots for a resource's configuration.
pub fn generate_slots(config: &SlotConfig) -> Result<SlotIter, AppError> {
    SlotIter::new(
        config.opening_time,
        config.closing_time,
        config.slot_duration_minutes,
        config.base_price,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use courthub_core::error::ErrorKind;
    use rust_decimal_macros::dec;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_slots_are_contiguous_and_fixed_width() {
        let slots: Vec<_> = SlotIter::new(t(6, 0), t(10, 0), 60, dec!(500))
            .unwrap()
            .collect();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].start_time, t(6, 0));
        assert_eq!(slots[3].end_time, t(10, 0));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        assert!(slots.iter().all(|s| s.range().duration_minutes() == 60));
    }

    #[test]
    fn test_partial_remainder_dropped() {
        let slots: Vec<_> = SlotIter::new(t(6, 0), t(8, 30), 60, dec!(500))
            .unwrap()
            .collect();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end_time, t(8, 0));
    }

    #[test]
    fn test_no_wrap_past_midnight() {
        let closing = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        let slots: Vec<_> = SlotIter::new(t(22, 0), closing, 60, dec!(500))
            .unwrap()
            .collect();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].end_time, t(23, 0));
    }

    #[test]
    fn test_invalid_input_is_configuration_error() {
        let err = SlotIter::new(t(6, 0), t(10, 0), 0, dec!(500)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        let err = SlotIter::new(t(10, 0), t(10, 0), 60, dec!(500)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}

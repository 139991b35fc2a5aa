//! Half-open time-of-day ranges.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: NaiveTime,
    /// Exclusive end.
    pub end: NaiveTime,
}

impl TimeRange {
    /// Create a range. Returns `None` unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Overlap test: `start1 < end2 && end1 > start2`.
    ///
    /// Ranges that merely touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `other` lies entirely inside this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Length of the range in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let a = TimeRange::new(t(10, 0), t(11, 0)).unwrap();
        let b = TimeRange::new(t(11, 0), t(12, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_partial_overlap() {
        let a = TimeRange::new(t(10, 0), t(11, 0)).unwrap();
        let b = TimeRange::new(t(10, 30), t(11, 30)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(TimeRange::new(t(10, 0), t(10, 0)).is_none());
        assert!(TimeRange::new(t(11, 0), t(10, 0)).is_none());
    }
}

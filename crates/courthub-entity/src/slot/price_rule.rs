//! Price rule entity model and day-type classification.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use courthub_core::types::id::{PriceRuleId, SlotConfigId};

/// Which days a price rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "day_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
    /// Every day.
    All,
}

impl DayType {
    /// Classify a calendar date as weekday or weekend.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }

    /// Whether a rule with this day type applies on a day of type `day`.
    pub fn applies_to(self, day: DayType) -> bool {
        self == Self::All || self == day
    }

    /// Return the day type as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekday => "WEEKDAY",
            Self::Weekend => "WEEKEND",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pricing adjustment attached to a slot configuration.
///
/// Every enabled rule whose window contains a slot's start adds its
/// surcharge; only the highest-priority matching rule may override the
/// base price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceRule {
    /// Unique rule identifier.
    pub id: PriceRuleId,
    /// The slot configuration this rule belongs to.
    pub slot_config_id: SlotConfigId,
    /// Day filter.
    pub day_type: DayType,
    /// Window start (inclusive).
    pub start_time: NaiveTime,
    /// Window end (exclusive).
    pub end_time: NaiveTime,
    /// Replacement base price.
    pub override_price: Option<Decimal>,
    /// Additive surcharge.
    pub surcharge: Option<Decimal>,
    /// Higher wins for the override.
    pub priority: i32,
    /// Whether the rule is active.
    pub enabled: bool,
}

impl PriceRule {
    /// Whether the rule applies to a slot starting at `slot_start` on a
    /// day of type `day`. The window is half-open.
    pub fn matches(&self, day: DayType, slot_start: NaiveTime) -> bool {
        self.enabled
            && self.day_type.applies_to(day)
            && self.start_time <= slot_start
            && slot_start < self.end_time
    }
}

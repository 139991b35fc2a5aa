//! Venue-local interpretation of the request clock.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use courthub_core::error::AppError;
use courthub_entity::venue::Venue;

/// Resolves "today" and "now" in a venue's local time zone.
#[derive(Debug, Clone, Copy)]
pub struct VenueClock {
    default_tz: Tz,
}

impl VenueClock {
    /// Build with the fallback zone from configuration.
    pub fn new(default_timezone: &str) -> Result<Self, AppError> {
        let default_tz = default_timezone.parse::<Tz>().map_err(|_| {
            AppError::configuration(format!("Unknown default time zone '{default_timezone}'"))
        })?;
        Ok(Self { default_tz })
    }

    /// The venue's zone, or the default when absent or unknown.
    pub fn zone_of(&self, venue: &Venue) -> Tz {
        match venue.timezone.as_deref() {
            None => self.default_tz,
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                warn!(service_id = %venue.id, timezone = %name, "Unknown venue time zone, using default");
                self.default_tz
            }),
        }
    }

    /// Local wall-clock time at the venue.
    pub fn local_now(&self, venue: &Venue, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.zone_of(venue)).naive_local()
    }

    /// The venue's current local date.
    pub fn today(&self, venue: &Venue, now: DateTime<Utc>) -> NaiveDate {
        self.local_now(venue, now).date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use courthub_core::types::id::ServiceId;

    fn venue(timezone: Option<&str>) -> Venue {
        Venue {
            id: ServiceId::new(),
            name: "Arena".into(),
            timezone: timezone.map(str::to_string),
            enabled: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_local_date_follows_venue_zone() {
        let clock = VenueClock::new("UTC").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 20, 0, 0).unwrap();
        assert_eq!(
            clock.today(&venue(Some("Asia/Kolkata")), now),
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
        assert_eq!(
            clock.today(&venue(None), now),
            NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
        );
    }

    #[test]
    fn test_unknown_zone_falls_back() {
        let clock = VenueClock::new("UTC").unwrap();
        assert_eq!(clock.zone_of(&venue(Some("Mars/Olympus"))), Tz::UTC);
        assert!(VenueClock::new("Nowhere/Special").is_err());
    }
}

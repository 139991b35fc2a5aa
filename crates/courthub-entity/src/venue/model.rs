//! Venue service entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courthub_core::types::id::ServiceId;

/// A venue service that owns bookable resources.
///
/// Managed by venue administration; the booking engine only reads the
/// name and the local time zone used to decide what "today" means.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    /// Unique service identifier.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// IANA time zone name (e.g. `"Asia/Kolkata"`).
    pub timezone: Option<String>,
    /// Whether the venue accepts bookings.
    pub enabled: bool,
    /// When the venue was created.
    pub created_at: DateTime<Utc>,
}

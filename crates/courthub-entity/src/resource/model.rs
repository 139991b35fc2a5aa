//! Resource entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use courthub_core::types::id::{ResourceId, ServiceId};

use super::tier::ResourceTier;

/// A concrete bookable unit (field, court) belonging to a service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// The owning service.
    pub service_id: ServiceId,
    /// Display name.
    pub name: String,
    /// Supported activity codes (uppercase, e.g. `"CRICKET"`).
    pub activities: Vec<String>,
    /// Whether the resource is bookable.
    pub enabled: bool,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Check whether the resource supports an activity code.
    pub fn supports(&self, activity_code: &str) -> bool {
        self.activities
            .iter()
            .any(|a| a.eq_ignore_ascii_case(activity_code))
    }

    /// Number of activities this resource supports.
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// The allocation tier implied by the activity count.
    pub fn tier(&self) -> ResourceTier {
        ResourceTier::for_activity_count(self.activity_count())
    }
}

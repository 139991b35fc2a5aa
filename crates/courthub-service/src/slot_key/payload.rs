//! Slot key payload and slot group identity.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use courthub_core::types::id::{ResourceId, ServiceId};
use courthub_entity::slot::TimeRange;

/// What a slot key attests: a priced slot on a pool, valid until
/// `expires_at` (Unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotKeyPayload {
    /// Stable identity of the slot and pool.
    pub slot_group_id: String,
    /// Owning service.
    pub service_id: ServiceId,
    /// Activity the slot was quoted for.
    pub activity_code: String,
    /// Day of play.
    pub date: NaiveDate,
    /// Slot start.
    pub start_time: NaiveTime,
    /// Slot end.
    pub end_time: NaiveTime,
    /// Pool members, sorted ascending.
    pub resource_ids: Vec<ResourceId>,
    /// Quoted price. Informational; bookings are repriced server-side.
    pub price: Decimal,
    /// Absolute expiry in Unix seconds.
    pub expires_at: i64,
}

impl SlotKeyPayload {
    /// The quoted slot as a time range.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// A key is expired once `now` is strictly past `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expires_at
    }
}

/// Deterministic identity of a slot on a pool.
///
/// First 32 hex characters of SHA-256 over
/// `service_id|date|start|end|id1,id2,...` with ids sorted ascending.
pub fn slot_group_id(
    service_id: ServiceId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    resource_ids: &[ResourceId],
) -> String {
    let mut ids = resource_ids.to_vec();
    ids.sort();
    let joined = ids
        .iter()
        .map(ResourceId::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let material = format!(
        "{service_id}|{}|{}|{}|{joined}",
        date.format("%Y-%m-%d"),
        start.format("%H:%M"),
        end.format("%H:%M")
    );
    let digest = Sha256::digest(material.as_bytes());
    hex::encode(&digest)[..32].to_string()
}

mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

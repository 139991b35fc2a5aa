//! Validation of submitted slot keys into one contiguous selection.

use chrono::{DateTime, NaiveDate, Utc};

use courthub_core::error::{AppError, codes};
use courthub_core::types::id::{ResourceId, ServiceId};
use courthub_entity::slot::TimeRange;

use crate::slot_key::{SlotKeyCodec, SlotKeyPayload};

/// A validated, contiguous run of quoted slots.
#[derive(Debug, Clone)]
pub struct SlotSelection {
    /// Service all keys belong to.
    pub service_id: ServiceId,
    /// Activity all keys were quoted for.
    pub activity_code: String,
    /// Day of play.
    pub date: NaiveDate,
    /// Sub-slots in start order.
    pub slots: Vec<TimeRange>,
    /// Pool members common to every key, sorted ascending.
    pub resource_ids: Vec<ResourceId>,
}

impl SlotSelection {
    /// The merged range from first start to last end.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.slots[0].start,
            end: self.slots[self.slots.len() - 1].end,
        }
    }
}

/// Decrypt every token and check that together they form one contiguous
/// selection on one service, activity, and date.
pub fn validate_selection(
    codec: &SlotKeyCodec,
    tokens: &[String],
    now: DateTime<Utc>,
    max_slots: usize,
) -> Result<SlotSelection, AppError> {
    if tokens.is_empty() {
        return Err(AppError::validation("At least one slot key is required"));
    }
    if tokens.len() > max_slots {
        return Err(AppError::validation(format!(
            "At most {max_slots} slots can be booked at once"
        )));
    }

    let mut payloads = tokens
        .iter()
        .map(|token| codec.open_unexpired(token, now))
        .collect::<Result<Vec<SlotKeyPayload>, _>>()?;

    let first = &payloads[0];
    let (service_id, activity_code, date) = (first.service_id, first.activity_code.clone(), first.date);
    let consistent = payloads.iter().all(|p| {
        p.service_id == service_id && p.activity_code == activity_code && p.date == date
    });
    if !consistent {
        return Err(AppError::validation("Slot keys must share service, activity and date")
            .with_code(codes::SLOT_KEYS_MISMATCHED));
    }

    payloads.sort_by_key(|p| p.start_time);
    let contiguous = payloads
        .windows(2)
        .all(|pair| pair[0].end_time == pair[1].start_time);
    if !contiguous {
        return Err(AppError::validation("Slots must be contiguous")
            .with_code(codes::SLOTS_NOT_CONTIGUOUS));
    }

    let mut resource_ids = payloads[0].resource_ids.clone();
    for payload in &payloads[1..] {
        resource_ids.retain(|id| payload.resource_ids.contains(id));
    }
    resource_ids.sort();
    resource_ids.dedup();

    Ok(SlotSelection {
        service_id,
        activity_code,
        date,
        slots: payloads.iter().map(SlotKeyPayload::range).collect(),
        resource_ids,
    })
}

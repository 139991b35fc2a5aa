//! Per-slot availability and slot key issuance.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use courthub_core::error::AppError;
use courthub_core::types::id::ServiceId;
use courthub_database::CatalogStore;

use super::timezone::VenueClock;
use crate::allocation::OccupancyMap;
use crate::context::RequestContext;
use crate::pool::PoolBuilder;
use crate::slot::PriceSheet;
use crate::slot_key::{SlotKeyCodec, SlotKeyPayload, slot_group_id};

/// One quoted slot as shown to customers.
#[derive(Debug, Clone, Serialize)]
pub struct QuotedSlot {
    /// Stable identity of the slot on its pool.
    pub slot_group_id: String,
    /// Booking token; absent when nothing is free.
    pub slot_key: Option<String>,
    /// Slot start.
    pub start_time: NaiveTime,
    /// Slot end.
    pub end_time: NaiveTime,
    /// Slot width.
    pub duration_minutes: i32,
    /// Effective price.
    pub price: Decimal,
    /// Free pooled resources.
    pub available_count: usize,
    /// Pool size.
    pub total_count: usize,
}

/// Builds availability listings for a service, activity, and date.
#[derive(Clone)]
pub struct AvailabilityService {
    catalog: Arc<dyn CatalogStore>,
    pools: PoolBuilder,
    codec: Arc<SlotKeyCodec>,
    clock: VenueClock,
}

impl std::fmt::Debug for AvailabilityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityService").finish_non_exhaustive()
    }
}

impl AvailabilityService {
    /// Creates a new availability service.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        codec: Arc<SlotKeyCodec>,
        clock: VenueClock,
    ) -> Self {
        Self {
            pools: PoolBuilder::new(Arc::clone(&catalog)),
            catalog,
            codec,
            clock,
        }
    }

    /// Quote every slot of the day.
    ///
    /// Past dates yield nothing; for today, slots that already ended in the
    /// venue's local time are omitted. Advisory only: no locks are taken.
    pub async fn quote(
        &self,
        ctx: &RequestContext,
        service_id: ServiceId,
        activity_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<QuotedSlot>, AppError> {
        let activity_code = activity_code.trim().to_ascii_uppercase();
        let venue = self
            .catalog
            .find_venue(service_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {service_id} not found")))?;

        let now = ctx.request_time;
        let local_now = self.clock.local_now(&venue, now);
        if date < local_now.date() {
            return Ok(Vec::new());
        }
        let cutoff = (date == local_now.date()).then(|| local_now.time());

        let pool = self.pools.build(service_id, &activity_code).await?;
        let (_, config) = pool.primary()?;
        let sheet = PriceSheet {
            config: config.clone(),
            rules: self.catalog.find_price_rules(config.id).await?,
        };

        let ids = pool.ids();
        let sorted_ids = pool.sorted_ids();
        let occupancy = self.catalog.find_occupancy(&ids, date).await?;
        let busy = OccupancyMap::from_parts(&occupancy.bookings, &occupancy.disabled, now);
        let expires_at = self.codec.expiry_from(now);

        let mut quoted = Vec::new();
        for slot in sheet.slots()? {
            if cutoff.is_some_and(|t| slot.end_time <= t) {
                continue;
            }
            let range = slot.range();
            let booked = busy.busy_count(&ids, &range);
            let available_count = pool.size().saturating_sub(booked);
            let price = sheet.price_at(slot.start_time, date);
            let group_id = slot_group_id(service_id, date, slot.start_time, slot.end_time, &sorted_ids);

            let slot_key = if available_count > 0 {
                Some(self.codec.seal(&SlotKeyPayload {
                    slot_group_id: group_id.clone(),
                    service_id,
                    activity_code: activity_code.clone(),
                    date,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    resource_ids: sorted_ids.clone(),
                    price,
                    expires_at,
                })?)
            } else {
                None
            };

            quoted.push(QuotedSlot {
                slot_group_id: group_id,
                slot_key,
                start_time: slot.start_time,
                end_time: slot.end_time,
                duration_minutes: slot.duration_minutes,
                price,
                available_count,
                total_count: pool.size(),
            });
        }

        debug!(
            service_id = %service_id,
            activity = %activity_code,
            date = %date,
            slots = quoted.len(),
            "Quoted availability"
        );
        Ok(quoted)
    }
}

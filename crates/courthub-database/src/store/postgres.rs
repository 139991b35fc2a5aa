//! PostgreSQL-backed stores.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use courthub_core::result::AppResult;
use courthub_core::types::id::{BookingId, ResourceId, ServiceId, SlotConfigId};
use courthub_entity::booking::{Booking, NewBooking};
use courthub_entity::disabled_slot::DisabledSlot;
use courthub_entity::resource::Resource;
use courthub_entity::slot::{PriceRule, SlotConfig, TimeRange};
use courthub_entity::venue::Venue;

use super::{BookingStore, BookingTransaction, CatalogStore, Occupancy};
use crate::connection::begin_serializable;
use crate::error::map_sqlx_error;
use crate::repositories::{
    BookingRepository, DisabledSlotRepository, ResourceRepository, SlotConfigRepository,
    VenueRepository,
};

/// Catalog and booking store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    venues: VenueRepository,
    resources: ResourceRepository,
    slot_configs: SlotConfigRepository,
    disabled_slots: DisabledSlotRepository,
    bookings: BookingRepository,
}

impl PgStore {
    /// Build the store and its repositories over one pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            venues: VenueRepository::new(pool.clone()),
            resources: ResourceRepository::new(pool.clone()),
            slot_configs: SlotConfigRepository::new(pool.clone()),
            disabled_slots: DisabledSlotRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn find_venue(&self, service_id: ServiceId) -> AppResult<Option<Venue>> {
        self.venues.find_by_id(service_id).await
    }

    async fn find_resources_for_activity(
        &self,
        service_id: ServiceId,
        activity_code: &str,
    ) -> AppResult<Vec<Resource>> {
        self.resources.find_for_activity(service_id, activity_code).await
    }

    async fn find_slot_configs(&self, resource_ids: &[ResourceId]) -> AppResult<Vec<SlotConfig>> {
        self.slot_configs.find_enabled_for_resources(resource_ids).await
    }

    async fn find_price_rules(&self, slot_config_id: SlotConfigId) -> AppResult<Vec<PriceRule>> {
        self.slot_configs.find_price_rules(slot_config_id).await
    }

    async fn find_occupancy(
        &self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
    ) -> AppResult<Occupancy> {
        let bookings = self.bookings.find_active_on(resource_ids, date).await?;
        let disabled = self.disabled_slots.find_on_date(resource_ids, date).await?;
        Ok(Occupancy { bookings, disabled })
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn BookingTransaction>> {
        let tx = begin_serializable(&self.pool).await?;
        Ok(Box::new(PgBookingTransaction { tx }))
    }

    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        self.bookings.find_by_id(id).await
    }

    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Booking>> {
        self.bookings.find_by_reference(reference).await
    }

    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Vec<Booking>> {
        self.bookings.find_by_key(key).await
    }

    async fn expire_soft_locks(&self, now: DateTime<Utc>) -> AppResult<Vec<Booking>> {
        self.bookings.expire_soft_locks(now).await
    }
}

/// A serializable PostgreSQL transaction. Rolled back on drop by sqlx.
struct PgBookingTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl BookingTransaction for PgBookingTransaction {
    async fn lock_resources(
        &mut self,
        service_id: ServiceId,
        activity_code: &str,
        resource_ids: &[ResourceId],
    ) -> AppResult<Vec<Resource>> {
        ResourceRepository::lock_for_activity(&mut *self.tx, service_id, activity_code, resource_ids)
            .await
    }

    async fn find_overlapping(
        &mut self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        range: TimeRange,
    ) -> AppResult<Vec<Booking>> {
        BookingRepository::lock_overlapping(&mut *self.tx, resource_ids, date, range.start, range.end)
            .await
    }

    async fn find_disabled(
        &mut self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        range: TimeRange,
    ) -> AppResult<Vec<DisabledSlot>> {
        DisabledSlotRepository::find_overlapping(
            &mut *self.tx,
            resource_ids,
            date,
            range.start,
            range.end,
        )
        .await
    }

    async fn find_by_idempotency_key(&mut self, key: &str) -> AppResult<Vec<Booking>> {
        BookingRepository::find_by_idempotency_key(&mut *self.tx, key).await
    }

    async fn insert_booking(&mut self, new: NewBooking, now: DateTime<Utc>) -> AppResult<Booking> {
        BookingRepository::insert(&mut *self.tx, new, now).await
    }

    async fn lock_booking(&mut self, id: BookingId) -> AppResult<Option<Booking>> {
        BookingRepository::lock_by_id(&mut *self.tx, id).await
    }

    async fn update_booking(&mut self, booking: &Booking) -> AppResult<Booking> {
        BookingRepository::update_lifecycle(&mut *self.tx, booking).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to commit transaction"))
    }
}

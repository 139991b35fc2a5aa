//! In-memory stores for tests and single-process runs.
//!
//! Committed state lives behind `std::sync::RwLock`s and is never held
//! across an await. Writers take one async mutex for the lifetime of a
//! transaction, so transactions are fully serialized; reads see committed
//! state only.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use courthub_core::error::{AppError, codes};
use courthub_core::result::AppResult;
use courthub_core::types::id::{BookingId, ResourceId, ServiceId, SlotConfigId};
use courthub_entity::booking::{Booking, BookingStatus, NewBooking};
use courthub_entity::disabled_slot::DisabledSlot;
use courthub_entity::resource::Resource;
use courthub_entity::slot::{PriceRule, SlotConfig, TimeRange};
use courthub_entity::venue::Venue;

use super::{BookingStore, BookingTransaction, CatalogStore, Occupancy};

#[derive(Debug, Default)]
struct Catalog {
    venues: Vec<Venue>,
    resources: Vec<Resource>,
    slot_configs: Vec<SlotConfig>,
    price_rules: Vec<PriceRule>,
    disabled_slots: Vec<DisabledSlot>,
}

#[derive(Debug, Default)]
struct Shared {
    catalog: RwLock<Catalog>,
    bookings: RwLock<Vec<Booking>>,
    writer: Arc<Mutex<()>>,
}

/// Process-local catalog and booking store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn is_active(booking: &Booking) -> bool {
    !matches!(
        booking.status,
        BookingStatus::Cancelled | BookingStatus::CancelledByUser | BookingStatus::Expired
    )
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a venue.
    pub fn add_venue(&self, venue: Venue) {
        write(&self.shared.catalog).venues.push(venue);
    }

    /// Register a resource.
    pub fn add_resource(&self, resource: Resource) {
        write(&self.shared.catalog).resources.push(resource);
    }

    /// Register a slot configuration.
    pub fn add_slot_config(&self, config: SlotConfig) {
        write(&self.shared.catalog).slot_configs.push(config);
    }

    /// Register a price rule; declaration order is insertion order.
    pub fn add_price_rule(&self, rule: PriceRule) {
        write(&self.shared.catalog).price_rules.push(rule);
    }

    /// Register a disabled slot.
    pub fn add_disabled_slot(&self, slot: DisabledSlot) {
        write(&self.shared.catalog).disabled_slots.push(slot);
    }

    /// Enable or disable a resource.
    pub fn set_resource_enabled(&self, id: ResourceId, enabled: bool) {
        let mut catalog = write(&self.shared.catalog);
        if let Some(resource) = catalog.resources.iter_mut().find(|r| r.id == id) {
            resource.enabled = enabled;
        }
    }

    /// Insert a pre-built booking, bypassing allocation.
    pub fn add_booking(&self, booking: Booking) {
        write(&self.shared.bookings).push(booking);
    }

    /// Snapshot of all committed bookings.
    pub fn bookings(&self) -> Vec<Booking> {
        read(&self.shared.bookings).clone()
    }

    fn resources_matching(
        &self,
        service_id: ServiceId,
        activity_code: &str,
        ids: Option<&[ResourceId]>,
    ) -> Vec<Resource> {
        let mut found: Vec<Resource> = read(&self.shared.catalog)
            .resources
            .iter()
            .filter(|r| r.service_id == service_id && r.enabled && r.supports(activity_code))
            .filter(|r| ids.is_none_or(|ids| ids.contains(&r.id)))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.created_at, r.id));
        found
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_venue(&self, service_id: ServiceId) -> AppResult<Option<Venue>> {
        Ok(read(&self.shared.catalog)
            .venues
            .iter()
            .find(|v| v.id == service_id)
            .cloned())
    }

    async fn find_resources_for_activity(
        &self,
        service_id: ServiceId,
        activity_code: &str,
    ) -> AppResult<Vec<Resource>> {
        Ok(self.resources_matching(service_id, activity_code, None))
    }

    async fn find_slot_configs(&self, resource_ids: &[ResourceId]) -> AppResult<Vec<SlotConfig>> {
        Ok(read(&self.shared.catalog)
            .slot_configs
            .iter()
            .filter(|c| c.enabled && resource_ids.contains(&c.resource_id))
            .cloned()
            .collect())
    }

    async fn find_price_rules(&self, slot_config_id: SlotConfigId) -> AppResult<Vec<PriceRule>> {
        Ok(read(&self.shared.catalog)
            .price_rules
            .iter()
            .filter(|r| r.slot_config_id == slot_config_id)
            .cloned()
            .collect())
    }

    async fn find_occupancy(
        &self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
    ) -> AppResult<Occupancy> {
        let on_resources = |id: Option<ResourceId>| id.is_some_and(|id| resource_ids.contains(&id));
        let bookings = read(&self.shared.bookings)
            .iter()
            .filter(|b| on_resources(b.resource_id) && b.booking_date == date && is_active(b))
            .cloned()
            .collect();
        let disabled = read(&self.shared.catalog)
            .disabled_slots
            .iter()
            .filter(|d| resource_ids.contains(&d.resource_id) && d.slot_date == date)
            .cloned()
            .collect();
        Ok(Occupancy { bookings, disabled })
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn BookingTransaction>> {
        let guard = self.shared.writer.clone().lock_owned().await;
        let staged = self.bookings();
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            staged,
            _writer: guard,
        }))
    }

    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(read(&self.shared.bookings).iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Booking>> {
        Ok(read(&self.shared.bookings)
            .iter()
            .find(|b| b.reference == reference)
            .cloned())
    }

    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Vec<Booking>> {
        Ok(by_idempotency_key(&read(&self.shared.bookings), key))
    }

    async fn expire_soft_locks(&self, now: DateTime<Utc>) -> AppResult<Vec<Booking>> {
        let _writer = self.shared.writer.lock().await;
        let mut bookings = write(&self.shared.bookings);
        let mut expired = Vec::new();
        for booking in bookings.iter_mut() {
            let lapsed = booking.status == BookingStatus::PaymentPending
                && booking.lock_expires_at.is_some_and(|at| at <= now);
            if lapsed {
                booking.status = BookingStatus::Expired;
                booking.updated_at = now;
                expired.push(booking.clone());
            }
        }
        Ok(expired)
    }
}

fn by_idempotency_key(bookings: &[Booking], key: &str) -> Vec<Booking> {
    let mut found: Vec<Booking> = bookings
        .iter()
        .filter(|b| {
            b.idempotency_key.as_deref() == Some(key)
                || b.parent_idempotency_key.as_deref() == Some(key)
        })
        .cloned()
        .collect();
    found.sort_by_key(|b| (b.start_time, b.created_at));
    found
}

/// Works on a private copy of the committed bookings; the copy replaces
/// committed state on commit and is discarded on drop.
struct MemoryTransaction {
    store: MemoryStore,
    staged: Vec<Booking>,
    _writer: OwnedMutexGuard<()>,
}

#[async_trait]
impl BookingTransaction for MemoryTransaction {
    async fn lock_resources(
        &mut self,
        service_id: ServiceId,
        activity_code: &str,
        resource_ids: &[ResourceId],
    ) -> AppResult<Vec<Resource>> {
        Ok(self
            .store
            .resources_matching(service_id, activity_code, Some(resource_ids)))
    }

    async fn find_overlapping(
        &mut self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        range: TimeRange,
    ) -> AppResult<Vec<Booking>> {
        Ok(self
            .staged
            .iter()
            .filter(|b| b.resource_id.is_some_and(|id| resource_ids.contains(&id)))
            .filter(|b| b.booking_date == date && is_active(b) && b.range().overlaps(&range))
            .cloned()
            .collect())
    }

    async fn find_disabled(
        &mut self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        range: TimeRange,
    ) -> AppResult<Vec<DisabledSlot>> {
        Ok(read(&self.store.shared.catalog)
            .disabled_slots
            .iter()
            .filter(|d| resource_ids.contains(&d.resource_id) && d.slot_date == date)
            .filter(|d| d.range().overlaps(&range))
            .cloned()
            .collect())
    }

    async fn find_by_idempotency_key(&mut self, key: &str) -> AppResult<Vec<Booking>> {
        Ok(by_idempotency_key(&self.staged, key))
    }

    async fn insert_booking(&mut self, new: NewBooking, now: DateTime<Utc>) -> AppResult<Booking> {
        if let Some(key) = new.idempotency_key.as_deref() {
            if self
                .staged
                .iter()
                .any(|b| b.idempotency_key.as_deref() == Some(key))
            {
                return Err(AppError::conflict("Failed to insert booking: idempotency key already used")
                    .with_code(codes::DUPLICATE_IDEMPOTENCY_KEY));
            }
        }
        if self.staged.iter().any(|b| b.reference == new.reference) {
            return Err(AppError::conflict("Failed to insert booking: duplicate value"));
        }

        let booking = new.into_booking(now);
        debug!(booking_id = %booking.id, "Staged booking insert");
        self.staged.push(booking.clone());
        Ok(booking)
    }

    async fn lock_booking(&mut self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.staged.iter().find(|b| b.id == id).cloned())
    }

    async fn update_booking(&mut self, booking: &Booking) -> AppResult<Booking> {
        let stored = self
            .staged
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking.id)))?;
        stored.status = booking.status;
        stored.payment_progress = booking.payment_progress;
        stored.lock_expires_at = booking.lock_expires_at;
        stored.cancellation_reason = booking.cancellation_reason.clone();
        stored.updated_at = booking.updated_at;
        Ok(stored.clone())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { store, staged, .. } = *self;
        *write(&store.shared.bookings) = staged;
        Ok(())
    }
}

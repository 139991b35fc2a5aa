//! Storage seams consumed by the booking engine.
//!
//! [`CatalogStore`] serves unlocked reads of venue configuration and
//! occupancy. [`BookingStore`] opens [`BookingTransaction`]s, inside which
//! every allocation and status change happens. Implementations:
//! - [`PgStore`]: PostgreSQL, `SERIALIZABLE` isolation plus `FOR UPDATE`
//! - [`MemoryStore`]: process-local, transactions serialized by one mutex

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use courthub_core::result::AppResult;
use courthub_core::types::id::{BookingId, ResourceId, ServiceId, SlotConfigId};
use courthub_entity::booking::{Booking, NewBooking};
use courthub_entity::disabled_slot::DisabledSlot;
use courthub_entity::resource::Resource;
use courthub_entity::slot::{PriceRule, SlotConfig, TimeRange};
use courthub_entity::venue::Venue;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Everything that may occupy a set of resources on one date.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    /// Active (non-terminal or completed) bookings.
    pub bookings: Vec<Booking>,
    /// Administrator-disabled slots.
    pub disabled: Vec<DisabledSlot>,
}

/// Read-only venue catalog and occupancy snapshot.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Find a venue by service id.
    async fn find_venue(&self, service_id: ServiceId) -> AppResult<Option<Venue>>;

    /// Enabled resources of a service supporting an activity, ordered by
    /// `(created_at, id)`.
    async fn find_resources_for_activity(
        &self,
        service_id: ServiceId,
        activity_code: &str,
    ) -> AppResult<Vec<Resource>>;

    /// Enabled slot configurations of the given resources.
    async fn find_slot_configs(&self, resource_ids: &[ResourceId]) -> AppResult<Vec<SlotConfig>>;

    /// Price rules of one configuration in declaration order.
    async fn find_price_rules(&self, slot_config_id: SlotConfigId) -> AppResult<Vec<PriceRule>>;

    /// Bookings and disabled slots of the given resources on a date.
    async fn find_occupancy(
        &self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
    ) -> AppResult<Occupancy>;
}

/// Transactional booking persistence.
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Open a serializable transaction.
    async fn begin(&self) -> AppResult<Box<dyn BookingTransaction>>;

    /// Find a booking by ID.
    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Find a booking by reference code.
    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Booking>>;

    /// Bookings created under a key, directly or as split children.
    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Vec<Booking>>;

    /// Transition every lapsed `PAYMENT_PENDING` booking to `EXPIRED`.
    async fn expire_soft_locks(&self, now: DateTime<Utc>) -> AppResult<Vec<Booking>>;
}

/// One unit of work against the booking store.
///
/// Dropping a transaction without calling [`commit`](Self::commit) rolls it
/// back.
#[async_trait]
pub trait BookingTransaction: Send {
    /// Row-lock the given resources, keeping those still enabled for the
    /// activity, in `(created_at, id)` order.
    async fn lock_resources(
        &mut self,
        service_id: ServiceId,
        activity_code: &str,
        resource_ids: &[ResourceId],
    ) -> AppResult<Vec<Resource>>;

    /// Active bookings on the resources overlapping `range`, row-locked.
    async fn find_overlapping(
        &mut self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        range: TimeRange,
    ) -> AppResult<Vec<Booking>>;

    /// Disabled slots on the resources overlapping `range`.
    async fn find_disabled(
        &mut self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        range: TimeRange,
    ) -> AppResult<Vec<DisabledSlot>>;

    /// Bookings created under a key, seen from inside the transaction.
    async fn find_by_idempotency_key(&mut self, key: &str) -> AppResult<Vec<Booking>>;

    /// Insert a booking.
    async fn insert_booking(&mut self, new: NewBooking, now: DateTime<Utc>) -> AppResult<Booking>;

    /// Row-lock a booking.
    async fn lock_booking(&mut self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Persist status, payment progress, lock expiry, and cancellation
    /// reason of a booking.
    async fn update_booking(&mut self, booking: &Booking) -> AppResult<Booking>;

    /// Commit the transaction.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use courthub_core::config::AppConfig;
use courthub_core::error::AppError;
use courthub_database::{BookingStore, CatalogStore, DatabasePool};
use courthub_service::{
    AvailabilityService, BookingLifecycleService, BookingService, EventBus, SlotKeyCodec,
    SoftLockService, VenueClock,
};

/// Shared application state injected into every handler via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool, absent when running on the in-memory store.
    pub db_pool: Option<DatabasePool>,
    /// Booking store, shared with the background sweep.
    pub store: Arc<dyn BookingStore>,
    /// Domain event fan-out.
    pub events: Arc<EventBus>,

    pub availability_service: Arc<AvailabilityService>,
    pub booking_service: Arc<BookingService>,
    pub soft_lock_service: Arc<SoftLockService>,
    pub lifecycle_service: Arc<BookingLifecycleService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("has_db_pool", &self.db_pool.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire every service over the given stores.
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn CatalogStore>,
        store: Arc<dyn BookingStore>,
    ) -> Result<Self, AppError> {
        let codec = Arc::new(SlotKeyCodec::from_config(&config.slot_key)?);
        let clock = VenueClock::new(&config.booking.default_timezone)?;
        let events = Arc::new(EventBus::default());

        let availability_service = Arc::new(AvailabilityService::new(
            Arc::clone(&catalog),
            Arc::clone(&codec),
            clock,
        ));
        let booking_service = Arc::new(BookingService::new(
            Arc::clone(&catalog),
            Arc::clone(&store),
            events.clone(),
            Arc::clone(&codec),
            config.booking.clone(),
        ));
        let soft_lock_service = Arc::new(SoftLockService::new(
            Arc::clone(&catalog),
            Arc::clone(&store),
            events.clone(),
            clock,
            config.booking.clone(),
        ));
        let lifecycle_service = Arc::new(BookingLifecycleService::new(
            Arc::clone(&store),
            events.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool: None,
            store,
            events,
            availability_service,
            booking_service,
            soft_lock_service,
            lifecycle_service,
        })
    }

    /// Attach the database pool used by the health check.
    pub fn with_db_pool(mut self, pool: DatabasePool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

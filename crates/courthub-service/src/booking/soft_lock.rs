//! Direct range booking held by a time-boxed soft lock.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{info, warn};

use courthub_core::config::BookingConfig;
use courthub_core::error::{AppError, codes};
use courthub_core::traits::EventPublisher;
use courthub_core::types::id::{ResourceId, ServiceId, UserId};
use courthub_database::{BookingStore, CatalogStore};
use courthub_entity::booking::{Booking, BookingStatus, NewBooking, PaymentMode, PaymentProgress};
use courthub_entity::slot::{SlotConfig, TimeRange};

use super::charge::Charge;
use super::created_event;
use super::reference::generate_reference;
use crate::allocation::OccupancyMap;
use crate::allocation::engine::find_single;
use crate::availability::VenueClock;
use crate::context::RequestContext;
use crate::events::publish_quietly;
use crate::pool::{PoolBuilder, TieredResources};
use crate::slot::{PriceSheet, generate_slots};

/// Request to hold a range while the customer pays.
#[derive(Debug, Clone, Deserialize)]
pub struct SoftLockRequest {
    /// Owning service.
    pub service_id: ServiceId,
    /// Activity to play.
    pub activity_code: String,
    /// Day of play.
    pub date: NaiveDate,
    /// Range start.
    pub start_time: NaiveTime,
    /// Range end.
    pub end_time: NaiveTime,
    /// Client retry token; scoped to the caller.
    pub client_request_id: Option<String>,
    /// How the customer pays.
    #[serde(default)]
    pub payment_mode: PaymentMode,
}

/// A held booking.
#[derive(Debug, Clone)]
pub struct SoftLockOutcome {
    /// The `PAYMENT_PENDING` booking.
    pub booking: Booking,
    /// Whether an existing lock was returned instead of a new one.
    pub resumed: bool,
}

/// Places and resumes soft locks.
#[derive(Clone)]
pub struct SoftLockService {
    catalog: Arc<dyn CatalogStore>,
    store: Arc<dyn BookingStore>,
    publisher: Arc<dyn EventPublisher>,
    pools: PoolBuilder,
    clock: VenueClock,
    config: BookingConfig,
}

impl std::fmt::Debug for SoftLockService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftLockService")
            .field("soft_lock_minutes", &self.config.soft_lock_minutes)
            .finish_non_exhaustive()
    }
}

/// The pool's slot grid restricted to `range`, which must start and end on
/// slot boundaries.
fn aligned_slots(config: &SlotConfig, range: TimeRange) -> Result<Vec<TimeRange>, AppError> {
    let slots: Vec<TimeRange> = generate_slots(config)?
        .map(|s| s.range())
        .filter(|s| range.contains(s))
        .collect();
    let aligned = matches!(
        (slots.first(), slots.last()),
        (Some(first), Some(last)) if first.start == range.start && last.end == range.end
    );
    if !aligned {
        return Err(AppError::validation(format!(
            "Range {}-{} does not align with the slot grid",
            range.start, range.end
        ))
        .with_code(codes::MISALIGNED_RANGE));
    }
    Ok(slots)
}

impl SoftLockService {
    /// Creates a new soft-lock service.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        store: Arc<dyn BookingStore>,
        publisher: Arc<dyn EventPublisher>,
        clock: VenueClock,
        config: BookingConfig,
    ) -> Self {
        Self {
            pools: PoolBuilder::new(Arc::clone(&catalog)),
            catalog,
            store,
            publisher,
            clock,
            config,
        }
    }

    /// Hold the first free pooled resource for the range.
    ///
    /// A caller retrying with the same client request id, or asking again
    /// for a range it already holds, gets the existing lock back unchanged.
    pub async fn lock(
        &self,
        ctx: &RequestContext,
        req: SoftLockRequest,
    ) -> Result<SoftLockOutcome, AppError> {
        let user_id = ctx.require_user()?;
        let now = ctx.request_time;
        let activity_code = req.activity_code.trim().to_ascii_uppercase();
        let range = TimeRange::new(req.start_time, req.end_time)
            .ok_or_else(|| AppError::validation("Start time must be before end time"))?;

        let venue = self
            .catalog
            .find_venue(req.service_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {} not found", req.service_id)))?;
        let local_now = self.clock.local_now(&venue, now);
        let in_past = req.date < local_now.date()
            || (req.date == local_now.date() && range.end <= local_now.time());
        if in_past {
            return Err(AppError::validation("Cannot lock a time range in the past"));
        }

        let key = req
            .client_request_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("{user_id}:{c}"));
        if let Some(key) = key.as_deref() {
            if let Some(outcome) = self.resume_by_key(key).await? {
                return Ok(outcome);
            }
        }

        let pool = self.pools.build(req.service_id, &activity_code).await?;
        let (_, config) = pool.primary()?;
        let slots = aligned_slots(config, range)?;
        if slots.len() > self.config.max_slots_per_booking {
            return Err(AppError::validation(format!(
                "At most {} slots can be booked at once",
                self.config.max_slots_per_booking
            )));
        }

        let attempt = self
            .lock_in_tx(ctx, user_id, &req, &activity_code, range, &slots, &pool.ids(), key.as_deref())
            .await;
        match attempt {
            Err(e)
                if e.has_code(codes::DUPLICATE_IDEMPOTENCY_KEY)
                    || e.has_code(codes::SERIALIZATION_FAILURE) =>
            {
                let Some(key) = key.as_deref() else {
                    return Err(e);
                };
                warn!(client_key = %key, error = %e, "Soft lock raced on client request id, re-reading");
                match self.resume_by_key(key).await? {
                    Some(outcome) => Ok(outcome),
                    None => Err(e),
                }
            }
            other => other,
        }
    }

    async fn resume_by_key(&self, key: &str) -> Result<Option<SoftLockOutcome>, AppError> {
        let existing = self.store.find_by_idempotency_key(key).await?;
        let held = existing.into_iter().find(|b| b.client_request_id.is_some());
        Ok(held.map(|booking| {
            info!(booking_id = %booking.id, "Soft lock resumed by client request id");
            SoftLockOutcome {
                booking,
                resumed: true,
            }
        }))
    }

    #[allow(clippy::too_many_arguments)]
    async fn lock_in_tx(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        req: &SoftLockRequest,
        activity_code: &str,
        range: TimeRange,
        slots: &[TimeRange],
        pool_ids: &[ResourceId],
        key: Option<&str>,
    ) -> Result<SoftLockOutcome, AppError> {
        let now = ctx.request_time;
        let mut tx = self.store.begin().await?;

        let locked = tx.lock_resources(req.service_id, activity_code, pool_ids).await?;
        if locked.is_empty() {
            return Err(AppError::conflict("Resource pool changed, refresh availability")
                .with_code(codes::POOL_CHANGED));
        }
        let ids: Vec<ResourceId> = locked.iter().map(|r| r.id).collect();
        let bookings = tx.find_overlapping(&ids, req.date, range).await?;

        let held = bookings.iter().find(|b| {
            b.is_owned_by(user_id)
                && b.holds_soft_lock(now)
                && b.service_id == req.service_id
                && b.activity_code == activity_code
                && b.range() == range
        });
        if let Some(held) = held {
            info!(booking_id = %held.id, "Soft lock resumed for identical range");
            return Ok(SoftLockOutcome {
                booking: held.clone(),
                resumed: true,
            });
        }

        let disabled = tx.find_disabled(&ids, req.date, range).await?;
        let occupancy = OccupancyMap::from_parts(&bookings, &disabled, now);
        let tiers = TieredResources::classify(&locked);
        let resource_id = find_single(&tiers, slots, &occupancy).ok_or_else(|| {
            AppError::conflict("No available resources for the selected time range")
                .with_code(codes::NO_AVAILABLE_RESOURCES)
        })?;

        let sheet = PriceSheet::load(self.catalog.as_ref(), resource_id).await?;
        let charge = Charge::compute(
            sheet.price_of(slots, req.date),
            self.config.platform_fee,
            self.config.advance_percent,
            req.payment_mode,
        );
        let new = NewBooking {
            reference: generate_reference(),
            resource_id,
            user_id: Some(user_id),
            service_id: req.service_id,
            activity_code: activity_code.to_string(),
            booking_date: req.date,
            start_time: range.start,
            end_time: range.end,
            total_amount: charge.total,
            online_amount: charge.online,
            venue_amount: charge.venue,
            platform_fee: charge.platform_fee,
            status: BookingStatus::PaymentPending,
            payment_progress: PaymentProgress::NotStarted,
            payment_mode: req.payment_mode,
            idempotency_key: key.map(str::to_string),
            parent_idempotency_key: None,
            client_request_id: req.client_request_id.clone(),
            split_group_id: None,
            lock_expires_at: Some(now + Duration::minutes(self.config.soft_lock_minutes)),
        };

        let booking = tx.insert_booking(new, now).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            reference = %booking.reference,
            resource_id = %resource_id,
            lock_minutes = self.config.soft_lock_minutes,
            "Soft lock placed"
        );
        publish_quietly(self.publisher.as_ref(), created_event(ctx, &booking)).await;
        Ok(SoftLockOutcome {
            booking,
            resumed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courthub_core::types::id::SlotConfigId;
    use rust_decimal_macros::dec;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn config() -> SlotConfig {
        SlotConfig {
            id: SlotConfigId::new(),
            resource_id: ResourceId::new(),
            opening_time: t(6, 0),
            closing_time: t(22, 0),
            slot_duration_minutes: 60,
            base_price: dec!(500),
            enabled: true,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_aligned_range_yields_sub_slots() {
        let slots = aligned_slots(&config(), TimeRange::new(t(10, 0), t(12, 0)).unwrap()).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].start, t(11, 0));
    }

    #[test]
    fn test_misaligned_range_rejected() {
        let err = aligned_slots(&config(), TimeRange::new(t(10, 30), t(12, 0)).unwrap()).unwrap_err();
        assert!(err.has_code(codes::MISALIGNED_RANGE));
        let err = aligned_slots(&config(), TimeRange::new(t(21, 0), t(23, 0)).unwrap()).unwrap_err();
        assert!(err.has_code(codes::MISALIGNED_RANGE));
    }

    use crate::testing::Fixture;
    use courthub_database::BookingStore as _;

    fn hold(fx: &Fixture, start: u32, end: u32, crid: Option<&str>) -> SoftLockRequest {
        SoftLockRequest {
            service_id: fx.service_id,
            activity_code: "CRICKET".into(),
            date: Fixture::date(),
            start_time: t(start, 0),
            end_time: t(end, 0),
            client_request_id: crid.map(str::to_string),
            payment_mode: PaymentMode::Online,
        }
    }

    #[tokio::test]
    async fn test_lock_places_payment_pending_hold() {
        let fx = Fixture::new();
        let outcome = fx.soft_locks().lock(&fx.customer(), hold(&fx, 10, 12, None)).await.unwrap();
        assert!(!outcome.resumed);
        let booking = outcome.booking;
        assert_eq!(booking.status, BookingStatus::PaymentPending);
        assert_eq!(booking.resource_id, Some(fx.exclusive));
        assert_eq!(booking.lock_expires_at, Some(Fixture::now() + Duration::minutes(10)));
        assert_eq!(booking.total_amount, dec!(1020.00));
    }

    #[tokio::test]
    async fn test_retry_with_client_request_id_resumes_without_extending() {
        let fx = Fixture::new();
        let service = fx.soft_locks();
        let user = fx.customer();
        let first = service.lock(&user, hold(&fx, 15, 16, Some("tab-1"))).await.unwrap();

        let later = user.clone().at(Fixture::now() + Duration::minutes(4));
        let again = service.lock(&later, hold(&fx, 15, 16, Some("tab-1"))).await.unwrap();
        assert!(again.resumed);
        assert_eq!(again.booking.id, first.booking.id);
        assert_eq!(again.booking.lock_expires_at, first.booking.lock_expires_at);
        assert_eq!(fx.store.bookings().len(), 1);
    }

    #[tokio::test]
    async fn test_same_user_same_range_resumes_existing_hold() {
        let fx = Fixture::new();
        let service = fx.soft_locks();
        let user = fx.customer();
        let first = service.lock(&user, hold(&fx, 7, 8, None)).await.unwrap();
        let again = service.lock(&user, hold(&fx, 7, 8, Some("other-tab"))).await.unwrap();
        assert!(again.resumed);
        assert_eq!(again.booking.id, first.booking.id);
    }

    #[tokio::test]
    async fn test_active_hold_blocks_other_customers() {
        let fx = Fixture::new();
        fx.store.set_resource_enabled(fx.shared, false);
        let service = fx.soft_locks();
        service.lock(&fx.customer(), hold(&fx, 10, 11, None)).await.unwrap();

        let err = service.lock(&fx.customer(), hold(&fx, 10, 11, None)).await.unwrap_err();
        assert!(err.has_code(codes::NO_AVAILABLE_RESOURCES));
    }

    #[tokio::test]
    async fn test_expired_hold_frees_resource() {
        let fx = Fixture::new();
        fx.store.set_resource_enabled(fx.shared, false);
        let service = fx.soft_locks();
        service.lock(&fx.customer(), hold(&fx, 10, 11, None)).await.unwrap();

        let after = Fixture::now() + Duration::minutes(11);
        let expired = fx.store.expire_soft_locks(after).await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].status, BookingStatus::Expired);

        let other = fx.customer().at(after);
        let outcome = service.lock(&other, hold(&fx, 10, 11, None)).await.unwrap();
        assert_eq!(outcome.booking.resource_id, Some(fx.exclusive));
    }

    #[tokio::test]
    async fn test_past_range_rejected() {
        let fx = Fixture::new();
        let mut req = hold(&fx, 6, 7, None);
        req.date = Fixture::date() - Duration::days(1);
        let err = fx.soft_locks().lock(&fx.customer(), req).await.unwrap_err();
        assert_eq!(err.kind, courthub_core::error::ErrorKind::Validation);
    }
}


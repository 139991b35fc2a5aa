//! Booking creation from quoted slot keys.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use courthub_core::config::BookingConfig;
use courthub_core::error::{AppError, codes};
use courthub_core::traits::EventPublisher;
use courthub_core::types::id::{ResourceId, UserId};
use courthub_database::{BookingStore, CatalogStore};
use courthub_entity::booking::{Booking, BookingStatus, NewBooking, PaymentMode, PaymentProgress};
use courthub_entity::slot::TimeRange;

use super::charge::Charge;
use super::created_event;
use super::reference::generate_reference;
use crate::allocation::{
    AllocationPlan, OccupancyMap, SlotCoverage, SlotSelection, plan_allocation, validate_selection,
};
use crate::context::{CallerRole, RequestContext};
use crate::events::publish_quietly;
use crate::pool::TieredResources;
use crate::slot::PriceSheet;
use crate::slot_key::SlotKeyCodec;

/// Request to book a contiguous run of quoted slots.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// Slot keys from an availability listing.
    pub slot_keys: Vec<String>,
    /// How the customer pays.
    #[serde(default, alias = "payment_method")]
    pub payment_mode: PaymentMode,
    /// Client-chosen key making retries safe.
    pub idempotency_key: Option<String>,
    /// Allow one booking per sub-slot when no single resource fits.
    #[serde(default)]
    pub allow_split: bool,
}

/// Result of a booking request.
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    /// One resource serves the whole range.
    Single {
        /// The merged booking.
        booking: Booking,
        /// Whether this is a replay of an earlier request.
        replayed: bool,
    },
    /// Independent bookings, one per sub-slot.
    Split {
        /// Shared by every child.
        split_group_id: Uuid,
        /// Children in start order.
        bookings: Vec<Booking>,
        /// Whether this is a replay of an earlier request.
        replayed: bool,
    },
    /// Nothing was booked; a split would succeed.
    PartialAvailable {
        /// Free resources per sub-slot.
        slots: Vec<SlotCoverage>,
    },
}

impl BookingOutcome {
    /// Rebuild the outcome of an earlier request from its rows.
    fn replayed(bookings: Vec<Booking>) -> Option<Self> {
        let first = bookings.first()?;
        match first.split_group_id {
            Some(split_group_id) if first.parent_idempotency_key.is_some() => Some(Self::Split {
                split_group_id,
                bookings,
                replayed: true,
            }),
            _ => bookings.into_iter().next().map(|booking| Self::Single {
                booking,
                replayed: true,
            }),
        }
    }

    /// Every booking carried by the outcome.
    pub fn bookings(&self) -> &[Booking] {
        match self {
            Self::Single { booking, .. } => std::slice::from_ref(booking),
            Self::Split { bookings, .. } => bookings,
            Self::PartialAvailable { .. } => &[],
        }
    }
}

/// Allocates resources to slot key selections.
#[derive(Clone)]
pub struct BookingService {
    catalog: Arc<dyn CatalogStore>,
    store: Arc<dyn BookingStore>,
    publisher: Arc<dyn EventPublisher>,
    codec: Arc<SlotKeyCodec>,
    config: BookingConfig,
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Everything a new row needs besides its resource and range.
struct Draft<'a> {
    ctx: &'a RequestContext,
    user_id: Option<UserId>,
    selection: &'a SlotSelection,
    payment_mode: PaymentMode,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        store: Arc<dyn BookingStore>,
        publisher: Arc<dyn EventPublisher>,
        codec: Arc<SlotKeyCodec>,
        config: BookingConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            publisher,
            codec,
            config,
        }
    }

    /// Book the selected slots.
    ///
    /// Runs in one serializable transaction. A repeated idempotency key
    /// returns the original bookings with `replayed = true`, including when
    /// two requests with the same key race.
    pub async fn create_booking(
        &self,
        ctx: &RequestContext,
        req: CreateBookingRequest,
    ) -> Result<BookingOutcome, AppError> {
        let user_id = match ctx.role {
            CallerRole::Customer => Some(ctx.require_user()?),
            CallerRole::Admin => ctx.user_id,
        };
        let key = req
            .idempotency_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        if let Some(key) = key.as_deref() {
            if let Some(outcome) = self.replay(ctx, user_id, key).await? {
                info!(idempotency_key = %key, "Replayed booking request");
                return Ok(outcome);
            }
        }

        let selection = validate_selection(
            &self.codec,
            &req.slot_keys,
            ctx.request_time,
            self.config.max_slots_per_booking,
        )?;
        let draft = Draft {
            ctx,
            user_id,
            selection: &selection,
            payment_mode: req.payment_mode,
        };

        match self.allocate(&draft, key.as_deref(), req.allow_split).await {
            Err(e)
                if e.has_code(codes::DUPLICATE_IDEMPOTENCY_KEY)
                    || e.has_code(codes::SERIALIZATION_FAILURE) =>
            {
                let Some(key) = key.as_deref() else {
                    return Err(e);
                };
                warn!(idempotency_key = %key, error = %e, "Booking raced on idempotency key, re-reading");
                match self.replay(ctx, user_id, key).await? {
                    Some(outcome) => Ok(outcome),
                    None => Err(e),
                }
            }
            other => other,
        }
    }

    async fn replay(
        &self,
        ctx: &RequestContext,
        user_id: Option<UserId>,
        key: &str,
    ) -> Result<Option<BookingOutcome>, AppError> {
        let existing = self.store.find_by_idempotency_key(key).await?;
        replay_for(ctx, user_id, existing)
    }

    async fn allocate(
        &self,
        draft: &Draft<'_>,
        key: Option<&str>,
        allow_split: bool,
    ) -> Result<BookingOutcome, AppError> {
        let selection = draft.selection;
        let now = draft.ctx.request_time;
        let range = selection.range();

        let mut tx = self.store.begin().await?;
        if let Some(key) = key {
            let existing = tx.find_by_idempotency_key(key).await?;
            if let Some(outcome) = replay_for(draft.ctx, draft.user_id, existing)? {
                return Ok(outcome);
            }
        }

        let locked = tx
            .lock_resources(selection.service_id, &selection.activity_code, &selection.resource_ids)
            .await?;
        if locked.is_empty() {
            return Err(AppError::conflict("Resource pool changed, refresh availability")
                .with_code(codes::POOL_CHANGED));
        }
        let ids: Vec<ResourceId> = locked.iter().map(|r| r.id).collect();
        let bookings = tx.find_overlapping(&ids, selection.date, range).await?;
        let disabled = tx.find_disabled(&ids, selection.date, range).await?;
        let occupancy = OccupancyMap::from_parts(&bookings, &disabled, now);
        let tiers = TieredResources::classify(&locked);

        match plan_allocation(&tiers, &selection.slots, &occupancy, allow_split) {
            AllocationPlan::Single(resource_id) => {
                let sheet = PriceSheet::load(self.catalog.as_ref(), resource_id).await?;
                let subtotal = sheet.price_of(&selection.slots, selection.date);
                let mut new = self.draft_row(draft, resource_id, range, subtotal);
                new.idempotency_key = key.map(str::to_string);

                let booking = tx.insert_booking(new, now).await?;
                tx.commit().await?;

                info!(
                    booking_id = %booking.id,
                    reference = %booking.reference,
                    resource_id = %resource_id,
                    amount = %booking.total_amount,
                    "Booking created"
                );
                publish_quietly(self.publisher.as_ref(), created_event(draft.ctx, &booking)).await;
                Ok(BookingOutcome::Single {
                    booking,
                    replayed: false,
                })
            }
            AllocationPlan::Split(assignments) => {
                let split_group_id = Uuid::new_v4();
                let mut sheets: HashMap<ResourceId, PriceSheet> = HashMap::new();
                let mut created = Vec::with_capacity(assignments.len());

                for (index, assignment) in assignments.iter().enumerate() {
                    if !sheets.contains_key(&assignment.resource_id) {
                        let sheet =
                            PriceSheet::load(self.catalog.as_ref(), assignment.resource_id).await?;
                        sheets.insert(assignment.resource_id, sheet);
                    }
                    let subtotal = sheets
                        .get(&assignment.resource_id)
                        .map(|s| s.price_of(&[assignment.slot], selection.date))
                        .ok_or_else(|| AppError::internal("Price sheet missing for split child"))?;

                    let mut new = self.draft_row(draft, assignment.resource_id, assignment.slot, subtotal);
                    new.idempotency_key = key.map(|k| format!("{k}-{index}"));
                    new.parent_idempotency_key = key.map(str::to_string);
                    new.split_group_id = Some(split_group_id);
                    created.push(tx.insert_booking(new, now).await?);
                }
                tx.commit().await?;

                info!(
                    split_group_id = %split_group_id,
                    parts = created.len(),
                    "Split booking created"
                );
                for booking in &created {
                    publish_quietly(self.publisher.as_ref(), created_event(draft.ctx, booking)).await;
                }
                Ok(BookingOutcome::Split {
                    split_group_id,
                    bookings: created,
                    replayed: false,
                })
            }
            AllocationPlan::PartialAvailable(slots) => Ok(BookingOutcome::PartialAvailable { slots }),
            AllocationPlan::Unavailable => Err(AppError::conflict(
                "No available resources for the selected time range",
            )
            .with_code(codes::NO_AVAILABLE_RESOURCES)),
        }
    }

    fn draft_row(
        &self,
        draft: &Draft<'_>,
        resource_id: ResourceId,
        range: TimeRange,
        subtotal: Decimal,
    ) -> NewBooking {
        let charge = Charge::compute(
            subtotal,
            self.config.platform_fee,
            self.config.advance_percent,
            draft.payment_mode,
        );
        let (status, payment_progress) = if draft.ctx.is_admin() {
            (BookingStatus::Confirmed, PaymentProgress::Success)
        } else {
            (BookingStatus::Pending, PaymentProgress::NotStarted)
        };
        NewBooking {
            reference: generate_reference(),
            resource_id,
            user_id: draft.user_id,
            service_id: draft.selection.service_id,
            activity_code: draft.selection.activity_code.clone(),
            booking_date: draft.selection.date,
            start_time: range.start,
            end_time: range.end,
            total_amount: charge.total,
            online_amount: charge.online,
            venue_amount: charge.venue,
            platform_fee: charge.platform_fee,
            status,
            payment_progress,
            payment_mode: draft.payment_mode,
            idempotency_key: None,
            parent_idempotency_key: None,
            client_request_id: None,
            split_group_id: None,
            lock_expires_at: None,
        }
    }
}

/// Replay rows found under a key only for the caller that created them.
///
/// Customers may replay their own slot key bookings. Admins may replay any.
/// Soft-lock rows share the key column but are never replayed here.
fn replay_for(
    ctx: &RequestContext,
    user_id: Option<UserId>,
    existing: Vec<Booking>,
) -> Result<Option<BookingOutcome>, AppError> {
    if existing.is_empty() {
        return Ok(None);
    }
    let owned = existing.iter().all(|b| {
        b.client_request_id.is_none() && (ctx.is_admin() || b.user_id == user_id)
    });
    if !owned {
        return Err(AppError::conflict("Idempotency key already used")
            .with_code(codes::DUPLICATE_IDEMPOTENCY_KEY));
    }
    Ok(BookingOutcome::replayed(existing))
}

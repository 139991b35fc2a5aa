//! Status transitions after creation: payment start, confirmation,
//! completion, and cancellation.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use courthub_core::error::{AppError, codes};
use courthub_core::events::{BookingEvent, DomainEvent};
use courthub_core::traits::EventPublisher;
use courthub_core::types::id::BookingId;
use courthub_database::{BookingStore, BookingTransaction};
use courthub_entity::booking::{Booking, BookingStatus, PaymentProgress};

use crate::context::RequestContext;
use crate::events::publish_quietly;

/// Optional details supplied with a cancellation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelRequest {
    /// Free-text reason.
    pub reason: Option<String>,
}

/// Reads bookings and moves them through the status machine.
#[derive(Clone)]
pub struct BookingLifecycleService {
    store: Arc<dyn BookingStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl std::fmt::Debug for BookingLifecycleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingLifecycleService").finish_non_exhaustive()
    }
}

fn authorize(ctx: &RequestContext, booking: &Booking) -> Result<(), AppError> {
    if ctx.is_admin() || ctx.user_id.is_some_and(|u| booking.is_owned_by(u)) {
        Ok(())
    } else {
        Err(AppError::authorization("You do not have access to this booking"))
    }
}

fn require_admin(ctx: &RequestContext) -> Result<(), AppError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::authorization("Administrator role required"))
    }
}

fn invalid_transition(booking: &Booking, target: &str) -> AppError {
    AppError::conflict(format!(
        "Booking {} cannot move from {} to {target}",
        booking.reference, booking.status
    ))
    .with_code(codes::INVALID_TRANSITION)
}

async fn load_locked(
    tx: &mut dyn BookingTransaction,
    id: BookingId,
) -> Result<Booking, AppError> {
    tx.lock_booking(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
}

/// Fail when another blocking booking or a disabled slot now covers the
/// booking's range. Used before a non-locking booking starts locking.
async fn ensure_still_free(
    tx: &mut dyn BookingTransaction,
    booking: &Booking,
    ctx: &RequestContext,
) -> Result<(), AppError> {
    let Some(resource_id) = booking.resource_id else {
        return Ok(());
    };
    let range = booking.range();
    let others = tx
        .find_overlapping(&[resource_id], booking.booking_date, range)
        .await?;
    let taken = others
        .iter()
        .any(|b| b.id != booking.id && b.blocks(ctx.request_time));
    let disabled = !tx
        .find_disabled(&[resource_id], booking.booking_date, range)
        .await?
        .is_empty();
    if taken || disabled {
        return Err(AppError::conflict("The booked time range is no longer available")
            .with_code(codes::NO_AVAILABLE_RESOURCES));
    }
    Ok(())
}

impl BookingLifecycleService {
    /// Creates a new lifecycle service.
    pub fn new(store: Arc<dyn BookingStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Look up a booking by reference code.
    pub async fn find_by_reference(
        &self,
        ctx: &RequestContext,
        reference: &str,
    ) -> Result<Booking, AppError> {
        let booking = self
            .store
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {reference} not found")))?;
        authorize(ctx, &booking)?;
        Ok(booking)
    }

    /// Cancel a booking. Owners cancel as `CANCELLED_BY_USER`,
    /// administrators as `CANCELLED`. The row is kept.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        req: CancelRequest,
    ) -> Result<Booking, AppError> {
        let mut tx = self.store.begin().await?;
        let mut booking = load_locked(tx.as_mut(), id).await?;
        authorize(ctx, &booking)?;

        let target = if ctx.is_admin() {
            BookingStatus::Cancelled
        } else {
            BookingStatus::CancelledByUser
        };
        if !booking.status.can_transition_to(target) {
            return Err(invalid_transition(&booking, target.as_str()));
        }

        let refundable_amount = if booking.payment_progress == PaymentProgress::Success {
            booking.online_amount
        } else {
            Decimal::ZERO
        };
        booking.status = target;
        booking.cancellation_reason = req.reason.clone();
        booking.updated_at = ctx.request_time;
        let booking = tx.update_booking(&booking).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            reference = %booking.reference,
            status = %booking.status,
            "Booking cancelled"
        );
        publish_quietly(
            self.publisher.as_ref(),
            DomainEvent::booking(
                ctx.user_id,
                BookingEvent::Cancelled {
                    booking_id: booking.id,
                    reference: booking.reference.clone(),
                    cancelled_by: ctx.user_id,
                    refundable_amount,
                    reason: req.reason,
                },
            ),
        )
        .await;
        Ok(booking)
    }

    /// Record that the customer started paying. From here on the booking
    /// holds its resource.
    pub async fn mark_payment_started(
        &self,
        ctx: &RequestContext,
        id: BookingId,
    ) -> Result<Booking, AppError> {
        let mut tx = self.store.begin().await?;
        let mut booking = load_locked(tx.as_mut(), id).await?;
        authorize(ctx, &booking)?;

        let eligible = matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::AwaitingConfirmation
        ) && booking.payment_progress == PaymentProgress::NotStarted;
        if !eligible {
            return Err(invalid_transition(&booking, PaymentProgress::InProgress.as_str()));
        }
        ensure_still_free(tx.as_mut(), &booking, ctx).await?;

        booking.payment_progress = PaymentProgress::InProgress;
        booking.updated_at = ctx.request_time;
        let booking = tx.update_booking(&booking).await?;
        tx.commit().await?;

        info!(booking_id = %booking.id, "Payment started");
        Ok(booking)
    }

    /// Confirm a booking (administrators). Lapsed soft locks cannot be
    /// confirmed.
    pub async fn confirm(&self, ctx: &RequestContext, id: BookingId) -> Result<Booking, AppError> {
        require_admin(ctx)?;
        let now = ctx.request_time;
        let mut tx = self.store.begin().await?;
        let mut booking = load_locked(tx.as_mut(), id).await?;

        let lapsed = booking.status == BookingStatus::PaymentPending && !booking.holds_soft_lock(now);
        if lapsed || !booking.status.can_transition_to(BookingStatus::Confirmed) {
            return Err(invalid_transition(&booking, BookingStatus::Confirmed.as_str()));
        }
        if !booking.blocks(now) {
            ensure_still_free(tx.as_mut(), &booking, ctx).await?;
        }

        booking.status = BookingStatus::Confirmed;
        booking.payment_progress = PaymentProgress::Success;
        booking.lock_expires_at = None;
        booking.updated_at = now;
        let booking = tx.update_booking(&booking).await?;
        tx.commit().await?;

        info!(booking_id = %booking.id, reference = %booking.reference, "Booking confirmed");
        publish_quietly(
            self.publisher.as_ref(),
            DomainEvent::booking(
                ctx.user_id,
                BookingEvent::Confirmed {
                    booking_id: booking.id,
                    reference: booking.reference.clone(),
                },
            ),
        )
        .await;
        Ok(booking)
    }

    /// Mark a confirmed booking as played (administrators).
    pub async fn complete(&self, ctx: &RequestContext, id: BookingId) -> Result<Booking, AppError> {
        require_admin(ctx)?;
        let mut tx = self.store.begin().await?;
        let mut booking = load_locked(tx.as_mut(), id).await?;
        if !booking.status.can_transition_to(BookingStatus::Completed) {
            return Err(invalid_transition(&booking, BookingStatus::Completed.as_str()));
        }

        booking.status = BookingStatus::Completed;
        booking.updated_at = ctx.request_time;
        let booking = tx.update_booking(&booking).await?;
        tx.commit().await?;

        info!(booking_id = %booking.id, "Booking completed");
        Ok(booking)
    }
}

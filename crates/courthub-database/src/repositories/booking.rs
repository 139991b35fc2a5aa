//! Booking repository implementation.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgExecutor;
use sqlx::{PgConnection, PgPool};

use courthub_core::result::AppResult;
use courthub_core::types::id::{BookingId, ResourceId};
use courthub_entity::booking::{Booking, NewBooking};

use crate::error::map_sqlx_error;

/// Statuses that can still occupy a resource. Whether a row actually blocks
/// is decided by [`Booking::blocks`].
const ACTIVE_FILTER: &str = "status NOT IN ('CANCELLED', 'CANCELLED_BY_USER', 'EXPIRED')";

/// Repository for booking rows.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find booking"))
    }

    /// Find a booking by its reference code.
    pub async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE reference = $1")
            .bind(reference)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find booking"))
    }

    /// Bookings created under an idempotency key, including the children of
    /// a split request made with that key.
    pub async fn find_by_idempotency_key<'e, E>(executor: E, key: &str) -> AppResult<Vec<Booking>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE idempotency_key = $1 OR parent_idempotency_key = $1 \
             ORDER BY start_time, created_at",
        )
        .bind(key)
        .fetch_all(executor)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to look up idempotency key"))
    }

    /// Pool-backed variant of [`Self::find_by_idempotency_key`].
    pub async fn find_by_key(&self, key: &str) -> AppResult<Vec<Booking>> {
        Self::find_by_idempotency_key(&self.pool, key).await
    }

    /// Active bookings of the given resources on a date, without locks.
    pub async fn find_active_on(
        &self,
        resource_ids: &[ResourceId],
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT * FROM bookings \
             WHERE resource_id = ANY($1) AND booking_date = $2 AND {ACTIVE_FILTER}"
        ))
        .bind(resource_ids)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load bookings"))
    }

    /// Active bookings overlapping `[start, end)`, row-locked.
    pub async fn lock_overlapping(
        conn: &mut PgConnection,
        resource_ids: &[ResourceId],
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT * FROM bookings \
             WHERE resource_id = ANY($1) AND booking_date = $2 \
             AND start_time < $4 AND end_time > $3 AND {ACTIVE_FILTER} \
             ORDER BY created_at \
             FOR UPDATE"
        ))
        .bind(resource_ids)
        .bind(date)
        .bind(start)
        .bind(end)
        .fetch_all(conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load overlapping bookings"))
    }

    /// Insert a booking row.
    pub async fn insert(
        conn: &mut PgConnection,
        new: NewBooking,
        now: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let b = new.into_booking(now);
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, reference, resource_id, user_id, service_id, activity_code, \
             booking_date, start_time, end_time, total_amount, online_amount, venue_amount, \
             platform_fee, status, payment_progress, payment_mode, idempotency_key, \
             parent_idempotency_key, client_request_id, split_group_id, lock_expires_at, \
             cancellation_reason, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24) RETURNING *",
        )
        .bind(b.id)
        .bind(&b.reference)
        .bind(b.resource_id)
        .bind(b.user_id)
        .bind(b.service_id)
        .bind(&b.activity_code)
        .bind(b.booking_date)
        .bind(b.start_time)
        .bind(b.end_time)
        .bind(b.total_amount)
        .bind(b.online_amount)
        .bind(b.venue_amount)
        .bind(b.platform_fee)
        .bind(b.status)
        .bind(b.payment_progress)
        .bind(b.payment_mode)
        .bind(&b.idempotency_key)
        .bind(&b.parent_idempotency_key)
        .bind(&b.client_request_id)
        .bind(b.split_group_id)
        .bind(b.lock_expires_at)
        .bind(&b.cancellation_reason)
        .bind(b.created_at)
        .bind(b.updated_at)
        .fetch_one(conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to insert booking"))
    }

    /// Row-lock a booking for a status transition.
    pub async fn lock_by_id(conn: &mut PgConnection, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to lock booking"))
    }

    /// Persist the mutable lifecycle columns of a booking.
    pub async fn update_lifecycle(conn: &mut PgConnection, booking: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, payment_progress = $3, lock_expires_at = $4, \
             cancellation_reason = $5, updated_at = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(booking.id)
        .bind(booking.status)
        .bind(booking.payment_progress)
        .bind(booking.lock_expires_at)
        .bind(&booking.cancellation_reason)
        .bind(booking.updated_at)
        .fetch_one(conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update booking"))
    }

    /// Mark every lapsed soft lock as expired and return the affected rows.
    pub async fn expire_soft_locks(&self, now: DateTime<Utc>) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'EXPIRED', updated_at = $1 \
             WHERE status = 'PAYMENT_PENDING' AND lock_expires_at <= $1 \
             RETURNING *",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to expire soft locks"))
    }
}

//! Booking creation, soft-lock, lookup, and lifecycle handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;

use courthub_core::error::AppError;
use courthub_core::types::id::BookingId;

use crate::dto::request::{CancelBody, CreateBookingBody, SoftLockBody, validate};
use crate::dto::response::{ApiResponse, BookingResultView, BookingView, SoftLockView};
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

type Reply<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<CreateBookingBody>, JsonRejection>,
) -> Reply<BookingResultView> {
    let Json(body) = body?;
    validate(&body)?;

    let outcome = state
        .booking_service
        .create_booking(&caller, body.into())
        .await?;
    let view = BookingResultView::at(outcome, caller.request_time);
    let status = if view.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::ok(view))))
}

/// POST /api/bookings/soft-lock
pub async fn soft_lock(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SoftLockBody>, JsonRejection>,
) -> Reply<SoftLockView> {
    let Json(body) = body?;
    validate(&body)?;

    let outcome = state.soft_lock_service.lock(&caller, body.into()).await?;
    let status = if outcome.resumed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let view = SoftLockView {
        booking: BookingView::at(outcome.booking, caller.request_time),
        resumed: outcome.resumed,
    };
    Ok((status, Json(ApiResponse::ok(view))))
}

/// GET /api/bookings/{reference}
pub async fn get_booking(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let Path(reference) = path?;
    let booking = state
        .lifecycle_service
        .find_by_reference(&caller, &reference)
        .await?;
    Ok(Json(ApiResponse::ok(BookingView::at(booking, caller.request_time))))
}

/// POST /api/bookings/{id}/cancel
///
/// The body is optional.
pub async fn cancel_booking(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<BookingId>, PathRejection>,
    body: Bytes,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let Path(id) = path?;
    let body: CancelBody = if body.iter().all(u8::is_ascii_whitespace) {
        CancelBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))?
    };
    validate(&body)?;

    let booking = state
        .lifecycle_service
        .cancel(&caller, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(BookingView::at(booking, caller.request_time))))
}

/// POST /api/bookings/{id}/payment-started
pub async fn payment_started(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<BookingId>, PathRejection>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let Path(id) = path?;
    let booking = state.lifecycle_service.mark_payment_started(&caller, id).await?;
    Ok(Json(ApiResponse::ok(BookingView::at(booking, caller.request_time))))
}

/// POST /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<BookingId>, PathRejection>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let Path(id) = path?;
    let booking = state.lifecycle_service.confirm(&caller, id).await?;
    Ok(Json(ApiResponse::ok(BookingView::at(booking, caller.request_time))))
}

/// POST /api/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<BookingId>, PathRejection>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let Path(id) = path?;
    let booking = state.lifecycle_service.complete(&caller, id).await?;
    Ok(Json(ApiResponse::ok(BookingView::at(booking, caller.request_time))))
}

//! Route definitions for the CourtHub HTTP API.
//!
//! All routes are mounted under `/api`. The booking segment is named
//! `{booking}` on every route: lookups read it as a reference code, action
//! routes as a booking id.

use std::time::Duration;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with request logging and the request timeout.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(availability_routes())
        .merge(booking_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Per-slot availability
fn availability_routes() -> Router<AppState> {
    Router::new().route(
        "/services/{service_id}/availability",
        get(handlers::availability::list_availability),
    )
}

/// Booking creation, soft locks, lookup, and lifecycle
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::create_booking))
        .route("/bookings/soft-lock", post(handlers::booking::soft_lock))
        .route("/bookings/{booking}", get(handlers::booking::get_booking))
        .route("/bookings/{booking}/cancel", post(handlers::booking::cancel_booking))
        .route(
            "/bookings/{booking}/payment-started",
            post(handlers::booking::payment_started),
        )
        .route("/bookings/{booking}/confirm", post(handlers::booking::confirm_booking))
        .route("/bookings/{booking}/complete", post(handlers::booking::complete_booking))
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

//! Availability listing handler.

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};

use courthub_core::types::id::ServiceId;
use courthub_service::QuotedSlot;

use crate::dto::request::{AvailabilityQuery, validate};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// GET /api/services/{service_id}/availability?activity=&date=
pub async fn list_availability(
    State(state): State<AppState>,
    caller: Caller,
    path: Result<Path<ServiceId>, PathRejection>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<QuotedSlot>>>, ApiError> {
    let Path(service_id) = path?;
    let Query(query) = query?;
    validate(&query)?;

    let slots = state
        .availability_service
        .quote(&caller, service_id, &query.activity, query.date)
        .await?;
    Ok(Json(ApiResponse::ok(slots)))
}

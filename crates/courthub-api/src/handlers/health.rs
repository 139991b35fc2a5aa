//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match &state.db_pool {
        None => None,
        Some(pool) => Some(match pool.health_check().await {
            Ok(true) => "connected".to_string(),
            Ok(false) | Err(_) => "unreachable".to_string(),
        }),
    };
    let status = match database.as_deref() {
        Some("unreachable") => "degraded",
        _ => "ok",
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}

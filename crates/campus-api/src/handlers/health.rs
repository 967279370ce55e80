//! Liveness and readiness probes. Mounted outside the middleware stack.

use axum::{extract::State, http::StatusCode, Json};
use campus_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
///
/// 503 until a pooled Postgres connection can be checked out.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database_ok = match state.pool() {
        Some(pool) => match pool.acquire().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Readiness: database unavailable");
                false
            }
        },
        None => false,
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse::ready(database_ok)))
}

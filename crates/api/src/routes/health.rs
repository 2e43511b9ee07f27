//! Health check endpoints for monitoring and orchestration.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;

/// Basic health check.
///
/// Returns 200 OK if the service is running.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Liveness probe.
///
/// Returns 200 OK as long as the process can serve requests.
pub async fn liveness() -> impl IntoResponse {
    Json(json!({ "status": "alive" }))
}

/// Readiness probe.
///
/// Verifies the database connection before reporting ready, so a load
/// balancer never routes submissions at a pod that cannot persist them.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let start = std::time::Instant::now();
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected",
                "database_latency_ms": start.elapsed().as_millis() as u64,
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not ready", "database": "disconnected" })),
            )
        }
    }
}

//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes health checks.
//!
//! - GET /health/live - Liveness check (process is alive)
//! - GET /health/ready - Readiness check (page shell is retrievable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the page shell can be fetched from the fragment source.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.shell_available().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status. Missing components degrade the status; a missing shell
/// makes the site unhealthy.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let shell_ok = state.shell_available().await;
    let last_failures = state
        .last_report
        .read()
        .await
        .as_ref()
        .map(|r| r.failed_count());

    let status = match (shell_ok, last_failures) {
        (false, _) => "unhealthy",
        (true, Some(n)) if n > 0 => "degraded",
        _ => "healthy",
    };

    Json(HealthResponse {
        status: status.to_string(),
        source: state.source.name().to_string(),
        shell: if shell_ok { "ok" } else { "error" }.to_string(),
        components: state.config.components.len(),
        last_failures,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

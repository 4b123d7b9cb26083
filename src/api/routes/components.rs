//! Component Routes
//!
//! - GET /api/v1/components - Registered components and their last load state
//! - GET /api/v1/assembly - Report from the most recent page assembly

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ComponentListResponse, ComponentStatus};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::components::LoadReport;

/// GET /api/v1/components
///
/// Lists components in iteration order.
pub async fn list_components(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ComponentListResponse>> {
    let registry = state.config.registry()?;
    let last_report = state.last_report.read().await;

    let components: Vec<ComponentStatus> = registry
        .sorted()
        .into_iter()
        .map(|c| ComponentStatus {
            identifier: c.identifier.clone(),
            source_path: c.source_path.clone(),
            order: c.order,
            loaded: last_report
                .as_ref()
                .map(|r| r.outcome(&c.identifier).is_some_and(|o| o.is_loaded())),
        })
        .collect();

    let total = components.len();
    Ok(Json(ComponentListResponse { components, total }))
}

/// GET /api/v1/assembly
pub async fn get_assembly(State(state): State<Arc<AppState>>) -> ApiResult<Json<LoadReport>> {
    state
        .last_report
        .read()
        .await
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No page has been assembled yet".to_string()))
}

//! Page Route
//!
//! - GET / - Assemble and return the portfolio page

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /
///
/// Assembles the page from the shell and every configured component.
/// Components that fail are left as empty placeholders.
pub async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    let page = state.assemble().await?;

    if !page.report.is_complete() {
        tracing::warn!(
            failed = page.report.failed_count(),
            "Page served with missing components"
        );
    }

    Ok(Html(page.html))
}

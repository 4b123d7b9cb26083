//! Folio HTTP Server
//!
//! Serves the assembled portfolio page, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Assembled page
//! - `GET /static/*` - Files under the site root (file source only)
//!
//! ## Components
//! - `GET /api/v1/components` - Registered components and last load state
//! - `GET /api/v1/assembly` - Report from the last assembly
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use folio::api::{serve, AppState};
//! use folio::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Config::load_default())?;
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::SourceKind;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/components", get(routes::components::list_components))
        .route("/assembly", get(routes::components::get_assembly));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.api.cors_origins);
    let static_root = match state.config.site.source {
        SourceKind::File => Some(state.config.site.root.clone()),
        SourceKind::Http => None,
    };

    let shared_state = Arc::new(state);

    let mut router = Router::new()
        .route("/", get(routes::page::index))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes);

    if let Some(root) = static_root {
        router = router.nest_service("/static", ServeDir::new(root));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS policy from the configured origins; `"*"` allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET])
}

/// Start the server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.api.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Folio listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Folio shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    const SHELL: &str = r#"<html><body><div id="header"></div><div id="about"></div><div id="projects"></div></body></html>"#;

    fn write_site(root: &std::path::Path) {
        std::fs::create_dir_all(root.join("components")).unwrap();
        std::fs::write(root.join("index.html"), SHELL).unwrap();
        std::fs::write(
            root.join("components/header.html"),
            "<h1>{{ profile.name }}</h1>",
        )
        .unwrap();
        std::fs::write(root.join("components/about.html"), "<p>About me</p>").unwrap();
    }

    fn create_test_app(root: &std::path::Path) -> Router {
        let mut config = Config::parse(
            r#"
[profile]
name = "Ada"

[[components]]
identifier = "header"
source_path = "components/header.html"
order = 0

[[components]]
identifier = "about"
source_path = "components/about.html"
order = 1

[[components]]
identifier = "projects"
source_path = "components/projects.html"
order = 2
"#,
        )
        .unwrap();
        config.site.root = root.to_string_lossy().to_string();

        build_router(AppState::new(config).unwrap())
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_live() {
        let dir = tempdir().unwrap();
        let app = create_test_app(dir.path());

        let (status, _) = send_get(app, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_requires_shell() {
        let dir = tempdir().unwrap();
        let app = create_test_app(dir.path());

        let (status, _) = send_get(app.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        write_site(dir.path());
        let (status, _) = send_get(app, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_assembles_page() {
        let dir = tempdir().unwrap();
        write_site(dir.path());
        let app = create_test_app(dir.path());

        let (status, body) = send_get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"<html><body><div id="header"><h1>Ada</h1></div><div id="about"><p>About me</p></div><div id="projects"></div></body></html>"#
        );
    }

    #[tokio::test]
    async fn test_index_without_shell() {
        let dir = tempdir().unwrap();
        let app = create_test_app(dir.path());

        let (status, body) = send_get(app, "/").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("SHELL_UNAVAILABLE"));
    }

    #[tokio::test]
    async fn test_assembly_report_after_page() {
        let dir = tempdir().unwrap();
        write_site(dir.path());
        let app = create_test_app(dir.path());

        let (status, _) = send_get(app.clone(), "/api/v1/assembly").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send_get(app.clone(), "/api/v1/components").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total"], 3);
        assert!(json["components"][0]["loaded"].is_null());

        send_get(app.clone(), "/").await;

        let (status, body) = send_get(app.clone(), "/api/v1/assembly").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["results"][0]["identifier"], "header");
        assert_eq!(json["results"][0]["status"], "loaded");
        assert_eq!(json["results"][2]["status"], "retrieval_failed");

        let (_, body) = send_get(app.clone(), "/api/v1/components").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["components"][1]["loaded"], true);
        assert_eq!(json["components"][2]["loaded"], false);

        let (_, body) = send_get(app, "/health").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["last_failures"], 1);
    }

    #[tokio::test]
    async fn test_static_fragments_served() {
        let dir = tempdir().unwrap();
        write_site(dir.path());
        let app = create_test_app(dir.path());

        let (status, body) = send_get(app, "/static/components/about.html").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<p>About me</p>");
    }
}

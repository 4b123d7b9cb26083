//! Fragment Sources
//!
//! The retrieval channel used by the assembler. A source turns a fragment path
//! into markup or a [`FetchError`]; the assembler never looks past that.
//!
//! - [`HttpFragmentSource`]: fetches `base_url + path` over HTTP
//! - [`FileFragmentSource`]: reads fragments below a root directory
//! - [`StaticFragmentSource`]: in-memory fragments

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::error::{FetchError, FetchResult};

/// Capability that retrieves fragment markup by path
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Retrieve the markup stored at `path`
    async fn fetch(&self, path: &str) -> FetchResult<String>;
}

#[async_trait]
impl<T: FragmentSource + ?Sized> FragmentSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self, path: &str) -> FetchResult<String> {
        (**self).fetch(path).await
    }
}

// ============================================
// HTTP
// ============================================

/// Configuration for [`HttpFragmentSource`]
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Base URL fragments are resolved against (e.g., "http://localhost:8090")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// Retrieves fragments over HTTP
pub struct HttpFragmentSource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpFragmentSource {
    /// Create a source with its own HTTP client
    pub fn new(config: HttpSourceConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FetchError::Transport {
                path: config.base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    /// Resolve a fragment path against the base URL
    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl FragmentSource for HttpFragmentSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, path: &str) -> FetchResult<String> {
        let url = self.url_for(path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                path: path.to_string(),
                message: if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

// ============================================
// Filesystem
// ============================================

/// Reads fragments from files below a root directory
#[derive(Debug, Clone)]
pub struct FileFragmentSource {
    root: PathBuf,
}

impl FileFragmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a fragment path onto the root, refusing anything that escapes it
    fn resolve(&self, path: &str) -> FetchResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));

        if relative.as_os_str().is_empty() {
            return Err(FetchError::InvalidPath(path.to_string()));
        }

        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(FetchError::InvalidPath(path.to_string())),
            }
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FragmentSource for FileFragmentSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, path: &str) -> FetchResult<String> {
        let full_path = self.resolve(path)?;

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(e) => Err(FetchError::Io(e)),
        }
    }
}

// ============================================
// In-memory
// ============================================

/// Serves fragments from memory
///
/// Paths can also be configured to fail with a status code, which makes this
/// the source of choice for exercising failure handling.
#[derive(Debug, Clone, Default)]
pub struct StaticFragmentSource {
    fragments: HashMap<String, String>,
    failures: HashMap<String, u16>,
}

impl StaticFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: serve `markup` at `path`
    pub fn with(mut self, path: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(path, markup);
        self
    }

    /// Builder: fail requests for `path` with `status`
    pub fn with_status(mut self, path: impl Into<String>, status: u16) -> Self {
        self.failures.insert(path.into(), status);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, markup: impl Into<String>) {
        self.fragments.insert(path.into(), markup.into());
    }
}

#[async_trait]
impl FragmentSource for StaticFragmentSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, path: &str) -> FetchResult<String> {
        if let Some(status) = self.failures.get(path) {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: *status,
            });
        }

        self.fragments
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tempfile::tempdir;
    use tokio::net::TcpListener;

    /// Serve a small fragment site on an ephemeral port, returning its base URL
    async fn spawn_fragment_server() -> String {
        let router = Router::new()
            .route("/components/nav.html", get(|| async { "<nav>links</nav>" }))
            .route("/components/gone.html", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/components/slow.html",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    "<p>late</p>"
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn http_source(base_url: String, request_timeout_ms: u64) -> HttpFragmentSource {
        HttpFragmentSource::new(HttpSourceConfig {
            base_url,
            request_timeout_ms,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticFragmentSource::new()
            .with("/header.html", "<h1>Hi</h1>")
            .with_status("/broken.html", 500);

        assert_eq!(source.fetch("/header.html").await.unwrap(), "<h1>Hi</h1>");
        assert!(matches!(
            source.fetch("/broken.html").await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            source.fetch("/missing.html").await,
            Err(FetchError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_reads_below_root() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("components")).unwrap();
        std::fs::write(dir.path().join("components/about.html"), "<p>About</p>").unwrap();

        let source = FileFragmentSource::new(dir.path());

        assert_eq!(
            source.fetch("/components/about.html").await.unwrap(),
            "<p>About</p>"
        );
        assert_eq!(
            source.fetch("components/about.html").await.unwrap(),
            "<p>About</p>"
        );
        assert!(matches!(
            source.fetch("components/nope.html").await,
            Err(FetchError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_rejects_traversal() {
        let dir = tempdir().unwrap();
        let source = FileFragmentSource::new(dir.path());

        assert!(matches!(
            source.fetch("../secret.html").await,
            Err(FetchError::InvalidPath(_))
        ));
        assert!(matches!(
            source.fetch("components/../../secret.html").await,
            Err(FetchError::InvalidPath(_))
        ));
        assert!(matches!(
            source.fetch("/").await,
            Err(FetchError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_http_url_resolution() {
        let source = HttpFragmentSource::new(HttpSourceConfig {
            base_url: "http://example.test/site/".to_string(),
            request_timeout_ms: 1000,
        })
        .unwrap();

        assert_eq!(
            source.url_for("/components/nav.html"),
            "http://example.test/site/components/nav.html"
        );
        assert_eq!(
            source.url_for("https://cdn.test/nav.html"),
            "https://cdn.test/nav.html"
        );
    }

    #[tokio::test]
    async fn test_arc_source_delegates() {
        let source: Arc<dyn FragmentSource> =
            Arc::new(StaticFragmentSource::new().with("/a.html", "a"));

        assert_eq!(source.name(), "static");
        assert_eq!(source.fetch("/a.html").await.unwrap(), "a");
    }

    #[tokio::test]
    async fn test_http_source_returns_body_on_success() {
        let source = http_source(spawn_fragment_server().await, 1000);

        assert_eq!(
            source.fetch("/components/nav.html").await.unwrap(),
            "<nav>links</nav>"
        );
    }

    #[tokio::test]
    async fn test_http_source_maps_error_status() {
        let source = http_source(spawn_fragment_server().await, 1000);

        match source.fetch("/components/gone.html").await {
            Err(FetchError::Status { path, status }) => {
                assert_eq!(path, "/components/gone.html");
                assert_eq!(status, 404);
            }
            other => panic!("expected status error, got {:?}", other),
        }

        // Unrouted paths are answered 404 by the server as well
        assert!(matches!(
            source.fetch("/components/unknown.html").await,
            Err(FetchError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_http_source_connection_refused_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = http_source(format!("http://{}", addr), 1000);

        assert!(matches!(
            source.fetch("/components/nav.html").await,
            Err(FetchError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_source_timeout_is_transport() {
        let source = http_source(spawn_fragment_server().await, 100);

        match source.fetch("/components/slow.html").await {
            Err(FetchError::Transport { path, message }) => {
                assert_eq!(path, "/components/slow.html");
                assert_eq!(message, "request timed out");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}

//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::api::error::ApiResult;
use crate::components::{FragmentSource, LoadReport};
use crate::config::Config;
use crate::page::{assemble_page, AssembledPage, PageRequest};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Site configuration (components, profile, server settings)
    pub config: Arc<Config>,
    /// Retrieval channel for the shell and fragments
    pub source: Arc<dyn FragmentSource>,
    /// Report from the most recent page assembly
    pub last_report: Arc<RwLock<Option<LoadReport>>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state using the source described by the configuration
    pub fn new(config: Config) -> ApiResult<Self> {
        let source = config.site.fragment_source()?;
        Ok(Self::with_source(config, source))
    }

    /// Create state with an explicit fragment source
    pub fn with_source(config: Config, source: Arc<dyn FragmentSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            last_report: Arc::new(RwLock::new(None)),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Assemble the page for one request
    ///
    /// Each call is its own page session with a fresh assembler. The report is
    /// kept for the status endpoints.
    pub async fn assemble(&self) -> ApiResult<AssembledPage> {
        let registry = self.config.registry()?;

        let page = assemble_page(
            PageRequest {
                shell_path: &self.config.site.shell,
                registry,
                profile: Some(&self.config.profile),
                today: Local::now().date_naive(),
            },
            Arc::clone(&self.source),
        )
        .await?;

        *self.last_report.write().await = Some(page.report.clone());
        Ok(page)
    }

    /// Whether the page shell can currently be retrieved
    pub async fn shell_available(&self) -> bool {
        self.source.fetch(&self.config.site.shell).await.is_ok()
    }
}

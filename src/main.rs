//! Folio Server
//!
//! Run with: cargo run --bin folio
//!
//! # Configuration
//!
//! Configuration is read from `FOLIO_CONFIG`, `~/.config/folio/config.toml`,
//! `/etc/folio/config.toml` or `./folio.toml`, in that order. Environment
//! variables (`FOLIO_SITE_ROOT`, `FOLIO_API_PORT`, ...) override file values.
//! `RUST_LOG` overrides the configured log level.

use anyhow::Context;
use folio::api::{serve, AppState};
use folio::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = folio::logging::with_bootstrap_logging(Config::load_default);
    folio::logging::init(&config.logging);

    tracing::info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    // Fail fast on a bad component list rather than on the first request
    let registry = config.registry().context("invalid component configuration")?;
    tracing::info!(
        components = registry.len(),
        source = ?config.site.source,
        shell = %config.site.shell,
        "Site configured"
    );

    let state = AppState::new(config).context("failed to create fragment source")?;

    if !state.shell_available().await {
        tracing::warn!(
            shell = %state.config.site.shell,
            "Page shell is not reachable yet; / will return 503 until it is"
        );
    }

    serve(state).await.context("server error")?;

    tracing::info!("Folio stopped");
    Ok(())
}

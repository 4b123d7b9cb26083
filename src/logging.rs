//! Tracing setup shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Build the env filter: `RUST_LOG` wins, otherwise the configured level
/// applies to this crate and tower_http
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "folio={level},tower_http={level}",
            level = config.level
        ))
    })
}

/// Install the global subscriber
///
/// `format = "json"` emits one JSON object per event; anything else uses the
/// human-readable formatter.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Run `f` with a temporary stderr subscriber at the default level
///
/// Configuration loading logs which file it used before the configured
/// subscriber can exist; this keeps those events visible.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    with_filter(env_filter(&LoggingConfig::default()), f)
}

fn with_filter<T>(filter: EnvFilter, f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

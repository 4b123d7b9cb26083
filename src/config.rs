//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::components::{
    ComponentRegistry, FetchResult, FileFragmentSource, FragmentSource, HttpFragmentSource,
    HttpSourceConfig, RegisteredComponent, RegistryError,
};
use crate::profile::Profile;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub components: Vec<RegisteredComponent>,

    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where fragments come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Read fragments from `site.root`
    File,
    /// Fetch fragments relative to `site.base_url`
    Http,
}

/// Site assembly configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_source")]
    pub source: SourceKind,

    /// Root directory for the file source (also served under /static)
    #[serde(default = "default_root")]
    pub root: String,

    /// Base URL for the HTTP source
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the page shell within the source
    #[serde(default = "default_shell")]
    pub shell: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Accept repeated component identifiers (last injection wins)
    #[serde(default)]
    pub allow_duplicate_ids: bool,
}

fn default_source() -> SourceKind {
    SourceKind::File
}

fn default_root() -> String {
    "./site".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_shell() -> String {
    "index.html".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            root: default_root(),
            base_url: default_base_url(),
            shell: default_shell(),
            request_timeout_ms: default_request_timeout_ms(),
            allow_duplicate_ids: false,
        }
    }
}

impl SiteConfig {
    /// Build the configured fragment source
    pub fn fragment_source(&self) -> FetchResult<Arc<dyn FragmentSource>> {
        let source: Arc<dyn FragmentSource> = match self.source {
            SourceKind::File => Arc::new(FileFragmentSource::new(&self.root)),
            SourceKind::Http => Arc::new(HttpFragmentSource::new(HttpSourceConfig {
                base_url: self.base_url.clone(),
                request_timeout_ms: self.request_timeout_ms,
            })?),
        };
        Ok(source)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `FOLIO_CONFIG`, default locations, or environment
    pub fn load_default() -> Self {
        let config_paths = [
            std::env::var("FOLIO_CONFIG").ok().map(PathBuf::from),
            dirs::config_dir().map(|p| p.join("folio").join("config.toml")),
            Some(PathBuf::from("/etc/folio/config.toml")),
            Some(PathBuf::from("./folio.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Build the component registry from the `[[components]]` list
    pub fn registry(&self) -> Result<ComponentRegistry, ConfigError> {
        ComponentRegistry::from_components(
            self.components.iter().cloned(),
            !self.site.allow_duplicate_ids,
        )
        .map_err(ConfigError::Registry)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Site overrides
        if let Ok(root) = std::env::var("FOLIO_SITE_ROOT") {
            self.site.root = root;
            self.site.source = SourceKind::File;
        }
        if let Ok(base_url) = std::env::var("FOLIO_SITE_BASE_URL") {
            self.site.base_url = base_url;
            self.site.source = SourceKind::Http;
        }
        if let Ok(shell) = std::env::var("FOLIO_SHELL") {
            self.site.shell = shell;
        }

        // API overrides
        if let Ok(host) = std::env::var("FOLIO_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("FOLIO_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("FOLIO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FOLIO_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid component list: {0}")]
    Registry(#[from] RegistryError),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Folio Configuration
#
# Environment variables override these settings:
# - FOLIO_CONFIG (path of this file)
# - FOLIO_SITE_ROOT (switches to the file source)
# - FOLIO_SITE_BASE_URL (switches to the http source)
# - FOLIO_SHELL
# - FOLIO_API_HOST
# - FOLIO_API_PORT
# - FOLIO_LOG_LEVEL
# - FOLIO_LOG_FORMAT

[site]
# Fragment source: "file" or "http"
source = "file"

# Directory holding the shell and fragments (file source)
root = "./site"

# Base URL fragments are fetched from (http source)
base_url = "http://localhost:8090"

# Page shell containing the placeholder elements
shell = "index.html"

# HTTP fragment request timeout (ms)
request_timeout_ms = 5000

# Allow the same placeholder id to be registered twice (last one wins)
allow_duplicate_ids = false

[profile]
name = "Your Name"
title = "Software Engineer"
email = "you@example.com"
location = "Earth"
# Used for {{ profile.experience_years }}
career_start = "2018-01-01"

# Components are loaded concurrently; `order` only sets iteration order.
[[components]]
identifier = "header-placeholder"
source_path = "components/header.html"
order = 0

[[components]]
identifier = "about-placeholder"
source_path = "components/about.html"
order = 1

[[components]]
identifier = "projects-placeholder"
source_path = "components/projects.html"
order = 2

[[components]]
identifier = "footer-placeholder"
source_path = "components/footer.html"
order = 3

[api]
host = "0.0.0.0"
port = 8090

# Allowed CORS origins (empty: same-origin only)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

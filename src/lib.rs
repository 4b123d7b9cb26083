//! # Folio
//!
//! Assembles a portfolio page from a shell document and HTML fragments.
//! Each registered component names a placeholder element and the fragment
//! that fills it; all fragments are fetched concurrently and injected as they
//! arrive.
//!
//! ## Features
//!
//! - **Concurrent loading**: every fragment is requested up front
//! - **Failure isolation**: a missing fragment or placeholder never breaks the page
//! - **Typed completion**: `load_all` returns a [`LoadReport`], events go over a channel
//! - **Pluggable retrieval**: filesystem, HTTP, or in-memory fragment sources
//!
//! ## Modules
//!
//! - [`components`]: Registry, fragment sources, placeholder documents, assembler
//! - [`page`]: Shell + components + profile tokens → page
//! - [`profile`]: Profile values and experience calculation
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::components::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut registry = ComponentRegistry::new();
//!     registry.register("about", "/about.html", 1);
//!     registry.register("header", "/header.html", 0);
//!
//!     let source = StaticFragmentSource::new()
//!         .with("/header.html", "<h1>Hello</h1>")
//!         .with("/about.html", "<p>About</p>");
//!     let shell = HtmlDocument::new(r#"<div id="header"></div><div id="about"></div>"#);
//!
//!     let assembler = ComponentAssembler::new(registry, source, shell);
//!     let report = assembler.load_all().await;
//!
//!     assert!(assembler.is_loaded("header").await);
//!     println!("Loaded {} components", report.loaded_count());
//! }
//! ```

pub mod api;
pub mod components;
pub mod config;
pub mod logging;
pub mod page;
pub mod profile;
pub mod sanitize;

// Re-export top-level types for convenience
pub use components::{
    ComponentAssembler, ComponentEvent, ComponentRegistry, FetchError, FileFragmentSource,
    FragmentSource, HtmlDocument, HttpFragmentSource, LoadOutcome, LoadReport,
    PlaceholderDocument, RegisteredComponent, RegistryError, StaticFragmentSource,
};

pub use page::{assemble_page, assemble_page_notifying, AssembledPage, PageError, PageRequest};

pub use profile::{experience_years, interpolate, Profile};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SiteConfig, SourceKind};

pub use sanitize::escape_html;

//! Folio Component Loading
//!
//! Page assembly core: register → fetch → inject → signal readiness.
//!
//! - **types**: Registered components, per-entry outcomes, reports, events
//! - **registry**: Append-only component registry
//! - **source**: Retrieval channel trait and HTTP/file/in-memory sources
//! - **document**: Placeholder document trait and the HTML implementation
//! - **assembler**: Concurrent fetch-and-inject with per-entry failure isolation
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use folio::components::{ComponentAssembler, ComponentRegistry, HtmlDocument, FileFragmentSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut registry = ComponentRegistry::new();
//!     registry.register("header-placeholder", "components/header.html", 0);
//!     registry.register("footer-placeholder", "components/footer.html", 10);
//!
//!     let shell = HtmlDocument::new(r#"<div id="header-placeholder"></div><div id="footer-placeholder"></div>"#);
//!     let assembler = ComponentAssembler::new(registry, FileFragmentSource::new("./site"), shell);
//!
//!     let report = assembler.load_all().await;
//!     println!("{} of {} components loaded", report.loaded_count(), report.results.len());
//!
//!     let html = assembler.into_document().into_string();
//!     println!("{}", html);
//! }
//! ```

pub mod assembler;
pub mod document;
pub mod error;
pub mod registry;
pub mod source;
pub mod types;

pub use assembler::ComponentAssembler;
pub use document::{HtmlDocument, PlaceholderDocument};
pub use error::{FetchError, FetchResult, RegistryError};
pub use registry::ComponentRegistry;
pub use source::{
    FileFragmentSource, FragmentSource, HttpFragmentSource, HttpSourceConfig, StaticFragmentSource,
};
pub use types::{ComponentEvent, ComponentResult, LoadOutcome, LoadReport, RegisteredComponent};

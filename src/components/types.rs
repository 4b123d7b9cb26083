//! Core component types
//!
//! - [`RegisteredComponent`]: one (identifier, source path, order) triple
//! - [`LoadOutcome`]: what happened to a single entry during assembly
//! - [`LoadReport`]: aggregate completion signal returned by `load_all`
//! - [`ComponentEvent`]: notifications delivered over an event channel

use serde::{Deserialize, Serialize};

/// A component registered for loading into a page placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredComponent {
    /// Placeholder lookup key (the element `id` in the page shell)
    pub identifier: String,
    /// Where the fragment markup is retrieved from
    pub source_path: String,
    /// Iteration sort key. Does not gate concurrency.
    #[serde(default)]
    pub order: i32,
}

impl RegisteredComponent {
    /// Create a component with order 0
    pub fn new(identifier: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source_path: source_path.into(),
            order: 0,
        }
    }

    /// Builder: set the iteration order
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Result of attempting to load one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Fragment fetched and injected
    Loaded,
    /// The retrieval channel failed; the placeholder is untouched
    RetrievalFailed { reason: String },
    /// Fragment fetched but no placeholder carries the identifier
    TargetMissing,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded)
    }
}

/// Outcome of one entry, paired with its identifier
#[derive(Debug, Clone, Serialize)]
pub struct ComponentResult {
    pub identifier: String,
    pub source_path: String,
    #[serde(flatten)]
    pub outcome: LoadOutcome,
}

/// Aggregate result of a `load_all` run
///
/// Results are listed in iteration order (ascending `order`, registration
/// order among ties), not completion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub results: Vec<ComponentResult>,
    pub elapsed_ms: u64,
}

impl LoadReport {
    /// Number of components injected
    pub fn loaded_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_loaded()).count()
    }

    /// Number of components that did not make it into the page
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.loaded_count()
    }

    /// True when every attempted component was injected
    pub fn is_complete(&self) -> bool {
        self.failed_count() == 0
    }

    /// Entries that were not injected
    pub fn failures(&self) -> impl Iterator<Item = &ComponentResult> {
        self.results.iter().filter(|r| !r.outcome.is_loaded())
    }

    /// Look up the outcome for an identifier (last attempt wins for duplicates)
    pub fn outcome(&self, identifier: &str) -> Option<&LoadOutcome> {
        self.results
            .iter()
            .rev()
            .find(|r| r.identifier == identifier)
            .map(|r| &r.outcome)
    }
}

/// Notification emitted while assembling a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentEvent {
    /// A component's fragment was injected into its placeholder
    Loaded { identifier: String },
    /// Every entry of a `load_all` run has settled
    AllLoaded,
}

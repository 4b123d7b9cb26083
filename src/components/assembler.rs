//! Component Assembler
//!
//! Fetches every registered fragment concurrently and injects each one into
//! its placeholder. Failures are isolated per entry: a fragment that cannot be
//! retrieved, or whose placeholder is missing, is logged and reported but never
//! fails the batch.
//!
//! ```text
//! registry.sorted() ─┬─ fetch(a) ─ inject(a) ─┐
//!                    ├─ fetch(b) ─ inject(b) ─┼─ join ─ AllLoaded ─ LoadReport
//!                    └─ fetch(c) ─ inject(c) ─┘
//! ```
//!
//! One assembler corresponds to one page session: its loaded-set only grows
//! and is dropped with the assembler.

use futures_util::future::join_all;
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex, RwLock};

use super::document::PlaceholderDocument;
use super::registry::ComponentRegistry;
use super::source::FragmentSource;
use super::types::{ComponentEvent, ComponentResult, LoadOutcome, LoadReport, RegisteredComponent};

/// Loads registered components into a placeholder document
pub struct ComponentAssembler<S, D> {
    registry: ComponentRegistry,
    source: S,
    document: Mutex<D>,
    loaded: RwLock<HashSet<String>>,
}

impl<S, D> ComponentAssembler<S, D>
where
    S: FragmentSource,
    D: PlaceholderDocument,
{
    /// Create an assembler for one page session
    pub fn new(registry: ComponentRegistry, source: S, document: D) -> Self {
        Self {
            registry,
            source,
            document: Mutex::new(document),
            loaded: RwLock::new(HashSet::new()),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Load a single component
    pub async fn load_one(&self, component: &RegisteredComponent) -> LoadOutcome {
        self.load_entry(component, None).await
    }

    /// Load every registered component and wait for all of them to settle
    pub async fn load_all(&self) -> LoadReport {
        self.run(None).await
    }

    /// Like [`load_all`](Self::load_all), also sending a [`ComponentEvent`]
    /// for each injected component and a final [`ComponentEvent::AllLoaded`]
    ///
    /// A dropped receiver is ignored.
    pub async fn load_all_notifying(&self, events: mpsc::UnboundedSender<ComponentEvent>) -> LoadReport {
        self.run(Some(&events)).await
    }

    /// Whether the identifier has been injected during this session
    pub async fn is_loaded(&self, identifier: &str) -> bool {
        self.loaded.read().await.contains(identifier)
    }

    /// Snapshot of every injected identifier
    pub async fn loaded_identifiers(&self) -> HashSet<String> {
        self.loaded.read().await.clone()
    }

    /// Consume the assembler, returning the document
    pub fn into_document(self) -> D {
        self.document.into_inner()
    }

    async fn run(&self, events: Option<&mpsc::UnboundedSender<ComponentEvent>>) -> LoadReport {
        let started = Instant::now();
        let components = self.registry.sorted();

        tracing::debug!(
            count = components.len(),
            source = self.source.name(),
            "Loading components"
        );

        // Every load is issued up front; join_all polls them concurrently
        // and resolves once all have settled.
        let outcomes = join_all(components.iter().map(|c| self.load_entry(c, events))).await;

        let results: Vec<ComponentResult> = components
            .iter()
            .zip(outcomes)
            .map(|(c, outcome)| ComponentResult {
                identifier: c.identifier.clone(),
                source_path: c.source_path.clone(),
                outcome,
            })
            .collect();

        let report = LoadReport {
            results,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if let Some(tx) = events {
            let _ = tx.send(ComponentEvent::AllLoaded);
        }

        tracing::info!(
            loaded = report.loaded_count(),
            failed = report.failed_count(),
            elapsed_ms = report.elapsed_ms,
            "All components loaded"
        );

        report
    }

    async fn load_entry(
        &self,
        component: &RegisteredComponent,
        events: Option<&mpsc::UnboundedSender<ComponentEvent>>,
    ) -> LoadOutcome {
        let markup = match self.source.fetch(&component.source_path).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::error!(
                    identifier = %component.identifier,
                    source = %component.source_path,
                    error = %e,
                    "Failed to load component"
                );
                return LoadOutcome::RetrievalFailed {
                    reason: e.to_string(),
                };
            }
        };

        let injected = self
            .document
            .lock()
            .await
            .replace_placeholder(&component.identifier, &markup);

        if !injected {
            tracing::warn!(
                identifier = %component.identifier,
                "Placeholder not found for component"
            );
            return LoadOutcome::TargetMissing;
        }

        self.loaded
            .write()
            .await
            .insert(component.identifier.clone());

        if let Some(tx) = events {
            let _ = tx.send(ComponentEvent::Loaded {
                identifier: component.identifier.clone(),
            });
        }

        tracing::debug!(identifier = %component.identifier, bytes = markup.len(), "Component loaded");
        LoadOutcome::Loaded
    }
}

//! Component Registry
//!
//! Append-only list of components to load into a page. Registration order is
//! preserved; [`ComponentRegistry::sorted`] orders by the declared `order`
//! key with a stable sort so ties keep registration order.

use super::error::RegistryError;
use super::types::RegisteredComponent;

/// Ordered collection of registered components
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    entries: Vec<RegisteredComponent>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component. Never fails; duplicate identifiers are accepted
    /// and the last one injected wins.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        source_path: impl Into<String>,
        order: i32,
    ) {
        self.register_component(
            RegisteredComponent::new(identifier, source_path).with_order(order),
        );
    }

    /// Append an already-built component
    pub fn register_component(&mut self, component: RegisteredComponent) {
        tracing::debug!(
            identifier = %component.identifier,
            source = %component.source_path,
            order = component.order,
            "Component registered"
        );
        self.entries.push(component);
    }

    /// Append a component, rejecting identifiers that are already registered
    pub fn try_register(&mut self, component: RegisteredComponent) -> Result<(), RegistryError> {
        if self.contains(&component.identifier) {
            return Err(RegistryError::DuplicateIdentifier(component.identifier));
        }
        self.register_component(component);
        Ok(())
    }

    /// Build a registry from a static component list
    ///
    /// With `strict` set, the first duplicate identifier aborts the build.
    pub fn from_components<I>(components: I, strict: bool) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RegisteredComponent>,
    {
        let mut registry = Self::new();
        for component in components {
            if strict {
                registry.try_register(component)?;
            } else {
                registry.register_component(component);
            }
        }
        Ok(registry)
    }

    /// All entries in registration order
    pub fn entries(&self) -> &[RegisteredComponent] {
        &self.entries
    }

    /// Entries sorted ascending by `order`, ties in registration order
    pub fn sorted(&self) -> Vec<&RegisteredComponent> {
        let mut sorted: Vec<&RegisteredComponent> = self.entries.iter().collect();
        // sort_by_key is stable
        sorted.sort_by_key(|c| c.order);
        sorted
    }

    /// Check whether an identifier has been registered
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|c| c.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Data Transfer Objects
//!
//! Response types for the JSON endpoints.

use serde::Serialize;

/// Health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded" or "unhealthy"
    pub status: String,
    /// Fragment source name
    pub source: String,
    /// "ok" when the page shell is retrievable
    pub shell: String,
    /// Number of registered components
    pub components: usize,
    /// Components that failed in the last assembly, if any ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failures: Option<usize>,
    pub uptime_seconds: u64,
    pub version: String,
}

/// A registered component with its state from the last assembly
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub identifier: String,
    pub source_path: String,
    pub order: i32,
    /// `None` until a page has been assembled
    pub loaded: Option<bool>,
}

/// Component list response
#[derive(Debug, Serialize)]
pub struct ComponentListResponse {
    pub components: Vec<ComponentStatus>,
    pub total: usize,
}

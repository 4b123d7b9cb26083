//! Component error types
//!
//! Errors raised while registering components or retrieving fragments.
//! None of these escape [`ComponentAssembler::load_all`](super::ComponentAssembler::load_all):
//! retrieval failures are logged and recorded per entry.

use thiserror::Error;

/// Errors reported by a [`FragmentSource`](super::FragmentSource)
#[derive(Error, Debug)]
pub enum FetchError {
    /// The retrieval channel answered with a non-success status
    #[error("Fragment {path} returned status {status}")]
    Status { path: String, status: u16 },

    /// The request never produced a response (connect, timeout, body read)
    #[error("Transport error fetching {path}: {message}")]
    Transport { path: String, message: String },

    /// No fragment exists at the requested path
    #[error("Fragment not found: {0}")]
    NotFound(String),

    /// Path escapes the fragment root or is otherwise unusable
    #[error("Invalid fragment path: {0}")]
    InvalidPath(String),

    /// Local I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether the failure came from the remote side rather than the request path
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Io(_))
    }
}

/// Errors raised by strict registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The identifier is already registered
    #[error("Component already registered: {0}")]
    DuplicateIdentifier(String),
}

/// Result type alias for fragment retrieval
pub type FetchResult<T> = Result<T, FetchError>;

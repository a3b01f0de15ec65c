//! services/tracker/src/error.rs
//!
//! Defines the error types for the tracker service.

use crate::config::ConfigError;
use reading_tracker_core::library::LibraryError;
use reading_tracker_core::ports::PortError;
use reading_tracker_core::validation::ValidationError;

/// Which stored collection an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Books,
    Events,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Books => write!(f, "books"),
            Collection::Events => write!(f, "reading events"),
        }
    }
}

/// Errors raised by the `ReadingTracker` application service.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Loading a collection from the store failed.
    #[error("Failed to load {collection}: {source}")]
    LoadFailed {
        collection: Collection,
        source: PortError,
    },

    /// Persisting a collection failed; the in-memory snapshot was left unchanged.
    #[error("Failed to save {collection}: {source}")]
    SaveFailed {
        collection: Collection,
        source: PortError,
    },

    /// The requested change does not apply to the current library.
    #[error(transparent)]
    Library(#[from] LibraryError),
}

impl From<ValidationError> for TrackerError {
    fn from(e: ValidationError) -> Self {
        TrackerError::Library(LibraryError::Validation(e))
    }
}

/// The primary error type for the `tracker` binaries.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the tracker service.
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

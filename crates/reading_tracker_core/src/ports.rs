//! crates/reading_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete key-value store and of the system clock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::{Book, ReadingEvent};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for the two collections.
///
/// Each save replaces the whole stored collection. A key that was never written
/// loads as an empty collection rather than an error.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn load_books(&self) -> PortResult<Vec<Book>>;

    async fn save_books(&self, books: &[Book]) -> PortResult<()>;

    async fn load_events(&self) -> PortResult<Vec<ReadingEvent>>;

    async fn save_events(&self, events: &[ReadingEvent]) -> PortResult<()>;
}

/// Source of the reference instant ("now").
///
/// The instant carries no zone; callers project it into the user's time zone
/// so every date gets the offset that applied on that date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

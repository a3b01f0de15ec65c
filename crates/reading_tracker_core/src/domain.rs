//! crates/reading_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::{NoContext, Timestamp, Uuid};

/// A tracked reading target with a known total page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub total_pages: u32,
    /// Sum of `pages` over every reading event that references this book.
    pub pages_read: u64,
}

impl Book {
    /// Creates a book with no pages read yet.
    pub fn new(id: String, title: String, total_pages: u32) -> Self {
        Self {
            id,
            title,
            total_pages,
            pages_read: 0,
        }
    }
}

/// A single logged reading session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    pub pages: u32,
    /// `None` for reading that is not tied to a tracked book.
    pub book_id: Option<String>,
}

impl ReadingEvent {
    pub fn new(date: DateTime<Utc>, pages: u32, book_id: Option<String>) -> Self {
        Self {
            id: new_id(date),
            date,
            pages,
            book_id,
        }
    }

    pub fn references(&self, book_id: &str) -> bool {
        self.book_id.as_deref() == Some(book_id)
    }
}

/// The derived streak state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakSnapshot {
    pub current_streak: u32,
    pub last_reading_date: Option<NaiveDate>,
    pub is_streak_active_today: bool,
}

/// Pages read on one calendar day, as shown in the weekly chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPages {
    pub date: NaiveDate,
    pub label: String,
    pub pages: u64,
}

/// Everything the statistics screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingStats {
    pub today_pages: u64,
    pub streak: StreakSnapshot,
    pub weekly: Vec<DailyPages>,
    pub chart_scale: u64,
    pub total_sessions: usize,
    pub total_pages: u64,
}

/// Generates a time-ordered identifier derived from the creation instant.
pub fn new_id(created_at: DateTime<Utc>) -> String {
    let seconds = created_at.timestamp().max(0) as u64;
    let ts = Timestamp::from_unix(NoContext, seconds, created_at.timestamp_subsec_nanos());
    Uuid::new_v7(ts).to_string()
}

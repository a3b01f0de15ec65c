//! crates/reading_tracker_core/src/library.rs
//!
//! An immutable snapshot of the user's books and reading events.
//!
//! Every mutation returns a new `Library` and leaves the original untouched,
//! so a caller can persist the new collections first and only then swap its
//! in-memory snapshot.

use crate::domain::{Book, ReadingEvent};
use crate::stats::recompute_book_pages;
use crate::validation::ValidationError;

/// Errors raised when a mutation cannot be applied to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("Unknown book: {0}")]
    UnknownBook(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A book whose stored page count disagrees with its events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesDrift {
    pub book_id: String,
    pub stored: u64,
    pub recomputed: u64,
}

/// What a consistency check of a snapshot found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub drift: Vec<PagesDrift>,
    /// Ids of events that reference a book no longer in the library.
    pub dangling_events: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.drift.is_empty() && self.dangling_events.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    books: Vec<Book>,
    events: Vec<ReadingEvent>,
}

impl Library {
    pub fn new(books: Vec<Book>, events: Vec<ReadingEvent>) -> Self {
        Self { books, events }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn events(&self) -> &[ReadingEvent] {
        &self.events
    }

    pub fn book(&self, book_id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == book_id)
    }

    /// Adds a book. Reading events are unchanged.
    pub fn with_book(&self, book: Book) -> Library {
        let mut books = self.books.clone();
        books.push(book);
        Library {
            books,
            events: self.events.clone(),
        }
    }

    /// Adds a reading event and credits its pages to the referenced book.
    pub fn with_event(&self, event: ReadingEvent) -> Result<Library, LibraryError> {
        let mut books = self.books.clone();
        if let Some(book_id) = event.book_id.as_deref() {
            let book = books
                .iter_mut()
                .find(|book| book.id == book_id)
                .ok_or_else(|| LibraryError::UnknownBook(book_id.to_string()))?;
            book.pages_read = book.pages_read.saturating_add(u64::from(event.pages));
        }

        let mut events = self.events.clone();
        events.push(event);
        Ok(Library { books, events })
    }

    /// Removes a book together with every event that references it.
    pub fn without_book(&self, book_id: &str) -> Result<Library, LibraryError> {
        if self.book(book_id).is_none() {
            return Err(LibraryError::UnknownBook(book_id.to_string()));
        }
        Ok(Library {
            books: self
                .books
                .iter()
                .filter(|book| book.id != book_id)
                .cloned()
                .collect(),
            events: self
                .events
                .iter()
                .filter(|event| !event.references(book_id))
                .cloned()
                .collect(),
        })
    }

    /// Books whose incrementally maintained `pages_read` differs from the sum of their events.
    pub fn pages_drift(&self) -> Vec<PagesDrift> {
        self.books
            .iter()
            .filter_map(|book| {
                let recomputed = recompute_book_pages(&self.events, &book.id);
                (recomputed != book.pages_read).then(|| PagesDrift {
                    book_id: book.id.clone(),
                    stored: book.pages_read,
                    recomputed,
                })
            })
            .collect()
    }

    /// Events whose book reference points at no existing book.
    pub fn dangling_events(&self) -> impl Iterator<Item = &ReadingEvent> {
        self.events.iter().filter(|event| {
            event
                .book_id
                .as_deref()
                .is_some_and(|book_id| self.book(book_id).is_none())
        })
    }

    /// Both consistency checks at once.
    pub fn integrity(&self) -> IntegrityReport {
        IntegrityReport {
            drift: self.pages_drift(),
            dangling_events: self.dangling_events().map(|event| event.id.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{compute_streak, compute_today_pages};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    fn book(id: &str, total: u32) -> Book {
        Book::new(id.to_string(), format!("Book {id}"), total)
    }

    fn read(book_id: Option<&str>, pages: u32, at: DateTime<Utc>) -> ReadingEvent {
        ReadingEvent::new(at, pages, book_id.map(str::to_string))
    }

    #[test]
    fn test_with_event_credits_book() {
        let library = Library::default().with_book(book("a", 300));
        let updated = library.with_event(read(Some("a"), 20, now())).unwrap();

        assert_eq!(updated.book("a").unwrap().pages_read, 20);
        assert_eq!(updated.events().len(), 1);
        // The original snapshot is untouched.
        assert_eq!(library.book("a").unwrap().pages_read, 0);
        assert!(library.events().is_empty());
    }

    #[test]
    fn test_with_event_without_book() {
        let library = Library::default().with_book(book("a", 300));
        let updated = library.with_event(read(None, 20, now())).unwrap();
        assert_eq!(updated.book("a").unwrap().pages_read, 0);
        assert_eq!(updated.events().len(), 1);
    }

    #[test]
    fn test_with_event_rejects_unknown_book() {
        let err = Library::default()
            .with_event(read(Some("ghost"), 5, now()))
            .unwrap_err();
        assert_eq!(err, LibraryError::UnknownBook("ghost".to_string()));
    }

    #[test]
    fn test_without_book_cascades() {
        let library = Library::default()
            .with_book(book("a", 100))
            .with_book(book("b", 100))
            .with_event(read(Some("a"), 10, now()))
            .unwrap()
            .with_event(read(Some("b"), 7, now()))
            .unwrap()
            .with_event(read(None, 3, now()))
            .unwrap();

        let trimmed = library.without_book("a").unwrap();
        assert!(trimmed.book("a").is_none());
        assert_eq!(trimmed.books().len(), 1);
        assert_eq!(trimmed.events().len(), 2);
        assert!(trimmed.events().iter().all(|e| !e.references("a")));
        assert_eq!(trimmed.dangling_events().count(), 0);
    }

    #[test]
    fn test_without_book_unknown() {
        assert_eq!(
            Library::default().without_book("nope"),
            Err(LibraryError::UnknownBook("nope".to_string()))
        );
    }

    #[test]
    fn test_incremental_pages_match_recomputation() {
        let mut library = Library::default()
            .with_book(book("a", 500))
            .with_book(book("b", 500))
            .with_book(book("c", 500));

        let plan: [(Option<&str>, u32); 7] = [
            (Some("a"), 12),
            (Some("b"), 30),
            (None, 8),
            (Some("a"), 4),
            (Some("c"), 60),
            (Some("b"), 1),
            (Some("a"), 19),
        ];
        for (i, (book_id, pages)) in plan.into_iter().enumerate() {
            let at = now() - Duration::days(i as i64);
            library = library.with_event(read(book_id, pages, at)).unwrap();
            assert!(library.pages_drift().is_empty());
        }
        assert_eq!(library.book("a").unwrap().pages_read, 35);

        library = library.without_book("b").unwrap();
        assert!(library.pages_drift().is_empty());
        library = library.with_event(read(Some("c"), 5, now())).unwrap();
        assert!(library.pages_drift().is_empty());
        assert_eq!(library.book("c").unwrap().pages_read, 65);
    }

    #[test]
    fn test_pages_drift_reports_mismatch() {
        let mut stale = book("a", 100);
        stale.pages_read = 99;
        let library = Library::new(vec![stale], vec![read(Some("a"), 10, now())]);
        assert_eq!(
            library.pages_drift(),
            vec![PagesDrift {
                book_id: "a".to_string(),
                stored: 99,
                recomputed: 10,
            }]
        );
    }

    #[test]
    fn test_integrity_reports_dangling_events() {
        let orphan = read(Some("gone"), 4, now());
        let orphan_id = orphan.id.clone();
        let library = Library::new(vec![book("a", 100)], vec![orphan, read(None, 2, now())]);

        let report = library.integrity();
        assert!(!report.is_clean());
        assert!(report.drift.is_empty());
        assert_eq!(report.dangling_events, vec![orphan_id]);

        assert!(Library::default().with_book(book("a", 10)).integrity().is_clean());
    }

    #[test]
    fn test_stats_after_deleting_todays_only_book() {
        let library = Library::default()
            .with_book(book("a", 100))
            .with_event(read(Some("a"), 25, now()))
            .unwrap()
            .with_event(read(None, 5, now() - Duration::days(3)))
            .unwrap();
        assert_eq!(compute_today_pages(library.events(), &now()), 25);

        let trimmed = library.without_book("a").unwrap();
        assert_eq!(compute_today_pages(trimmed.events(), &now()), 0);
        let streak = compute_streak(trimmed.events(), &now());
        assert_eq!(streak.current_streak, 0);
        assert!(!streak.is_streak_active_today);
    }
}

//! services/tracker/src/tracker.rs
//!
//! The application service. It owns the in-memory `Library` snapshot and
//! sequences every operation as load, compute, mutate, save, recompute.
//!
//! Reads degrade gracefully: a collection that fails to load is treated as
//! empty and the failure is returned alongside the result. Writes do not: a
//! mutation reloads both collections first and aborts on any load or save
//! failure, leaving the in-memory snapshot as it was.
//!
//! Calendar days are computed in the tracker's time zone. The clock only
//! supplies an instant; each event is projected with the offset in force at
//! that event's own instant, so a daylight-saving change between two events
//! does not move either of them to another day.

use std::sync::Arc;

use chrono::{Local, TimeZone};
use reading_tracker_core::domain::{new_id, Book, ReadingEvent, ReadingStats};
use reading_tracker_core::library::{IntegrityReport, Library};
use reading_tracker_core::ports::{Clock, ReadingStore};
use reading_tracker_core::stats::{compute_stats, DayLabeler};
use reading_tracker_core::validation::{validate_new_book, validate_session_pages};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::{Collection, TrackerError};

/// The result of a read: the value plus any collection that failed to load.
#[derive(Debug)]
pub struct Refreshed<T> {
    pub value: T,
    pub load_errors: Vec<TrackerError>,
}

pub struct ReadingTracker<Z = Local> {
    store: Arc<dyn ReadingStore>,
    clock: Arc<dyn Clock>,
    labeler: Arc<dyn DayLabeler>,
    zone: Z,
    library: Mutex<Library>,
}

impl ReadingTracker<Local> {
    /// A tracker that counts days in the machine's local time zone.
    pub fn new(
        store: Arc<dyn ReadingStore>,
        clock: Arc<dyn Clock>,
        labeler: Arc<dyn DayLabeler>,
    ) -> Self {
        Self::with_zone(store, clock, labeler, Local)
    }
}

impl<Z> ReadingTracker<Z>
where
    Z: TimeZone + Send + Sync,
{
    pub fn with_zone(
        store: Arc<dyn ReadingStore>,
        clock: Arc<dyn Clock>,
        labeler: Arc<dyn DayLabeler>,
        zone: Z,
    ) -> Self {
        Self {
            store,
            clock,
            labeler,
            zone,
            library: Mutex::new(Library::default()),
        }
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    /// Reloads both collections, substituting an empty one for any that fails.
    pub async fn refresh(&self) -> Refreshed<Library> {
        let mut library = self.library.lock().await;
        let (books, events) = futures::join!(self.store.load_books(), self.store.load_events());

        let mut load_errors = Vec::new();
        let books = books.unwrap_or_else(|source| {
            error!("Failed to load books: {}", source);
            load_errors.push(TrackerError::LoadFailed {
                collection: Collection::Books,
                source,
            });
            Vec::new()
        });
        let events = events.unwrap_or_else(|source| {
            error!("Failed to load reading events: {}", source);
            load_errors.push(TrackerError::LoadFailed {
                collection: Collection::Events,
                source,
            });
            Vec::new()
        });

        *library = Library::new(books, events);
        Refreshed {
            value: library.clone(),
            load_errors,
        }
    }

    /// Refreshes, then recomputes every statistic against the clock's "now".
    pub async fn stats(&self) -> Refreshed<ReadingStats> {
        let Refreshed { value, load_errors } = self.refresh().await;
        let now = self.clock.now().with_timezone(&self.zone);
        Refreshed {
            value: compute_stats(value.events(), &now, self.labeler.as_ref()),
            load_errors,
        }
    }

    /// The snapshot held in memory, without touching the store.
    pub async fn snapshot(&self) -> Library {
        self.library.lock().await.clone()
    }

    /// Checks the in-memory snapshot for page-count drift and events whose
    /// book is gone. Findings are logged, nothing is repaired.
    pub async fn verify(&self) -> IntegrityReport {
        let report = self.library.lock().await.integrity();
        for d in &report.drift {
            warn!(
                "Book {} stores {} pages read but its events sum to {}",
                d.book_id, d.stored, d.recomputed
            );
        }
        for event_id in &report.dangling_events {
            warn!("Reading event {} references a book that no longer exists", event_id);
        }
        report
    }

    //=====================================================================================
    // Mutations
    //=====================================================================================

    pub async fn create_book(&self, title: &str, total_pages: i64) -> Result<Book, TrackerError> {
        let (title, total_pages) = validate_new_book(title, total_pages)?;
        let mut library = self.library.lock().await;

        let current = self.load_for_update().await?;
        let created_at = self.clock.now();
        let book = Book::new(new_id(created_at), title, total_pages);
        let next = current.with_book(book.clone());

        self.persist(&current, &next, &[Collection::Books]).await?;
        *library = next;
        info!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub async fn add_event(
        &self,
        pages: i64,
        book_id: Option<String>,
    ) -> Result<ReadingEvent, TrackerError> {
        let pages = validate_session_pages(pages)?;
        let mut library = self.library.lock().await;

        let current = self.load_for_update().await?;
        let now = self.clock.now();
        let event = ReadingEvent::new(now, pages, book_id);
        let next = current.with_event(event.clone())?;

        let order: &[Collection] = if event.book_id.is_some() {
            &[Collection::Events, Collection::Books]
        } else {
            &[Collection::Events]
        };
        self.persist(&current, &next, order).await?;
        *library = next;
        info!("Logged {} pages (book: {:?})", event.pages, event.book_id);
        Ok(event)
    }

    /// Deletes a book and every reading event that references it.
    pub async fn delete_book(&self, book_id: &str) -> Result<(), TrackerError> {
        let mut library = self.library.lock().await;

        let current = self.load_for_update().await?;
        let next = current.without_book(book_id)?;
        let removed = current.events().len() - next.events().len();

        self.persist(&current, &next, &[Collection::Books, Collection::Events])
            .await?;
        *library = next;
        info!("Deleted book {} and {} reading events", book_id, removed);
        Ok(())
    }

    //=====================================================================================
    // Store Helpers
    //=====================================================================================

    async fn load_for_update(&self) -> Result<Library, TrackerError> {
        let (books, events) = futures::join!(self.store.load_books(), self.store.load_events());
        let books = books.map_err(|source| TrackerError::LoadFailed {
            collection: Collection::Books,
            source,
        })?;
        let events = events.map_err(|source| TrackerError::LoadFailed {
            collection: Collection::Events,
            source,
        })?;
        Ok(Library::new(books, events))
    }

    async fn save(&self, collection: Collection, library: &Library) -> Result<(), TrackerError> {
        let result = match collection {
            Collection::Books => self.store.save_books(library.books()).await,
            Collection::Events => self.store.save_events(library.events()).await,
        };
        result.map_err(|source| TrackerError::SaveFailed { collection, source })
    }

    /// Saves `next` collection by collection. If a later save fails, the
    /// collections already written are restored from `previous`.
    async fn persist(
        &self,
        previous: &Library,
        next: &Library,
        order: &[Collection],
    ) -> Result<(), TrackerError> {
        for (i, collection) in order.iter().enumerate() {
            if let Err(e) = self.save(*collection, next).await {
                error!("{}", e);
                for written in order[..i].iter().rev() {
                    if let Err(rollback) = self.save(*written, previous).await {
                        error!("Rollback of {} failed: {}", written, rollback);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

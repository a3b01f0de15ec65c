//! services/tracker/src/adapters/memory_store.rs
//!
//! An in-process implementation of the `ReadingStore` port. It keeps the same
//! JSON documents as the file store, and can be told to fail loads or saves
//! for a given key.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reading_tracker_core::domain::{Book, ReadingEvent};
use reading_tracker_core::ports::{PortError, PortResult, ReadingStore};

use super::records::{decode_books, decode_events, encode_books, encode_events, BOOKS_KEY, EVENTS_KEY};

#[derive(Default)]
struct Inner {
    items: HashMap<String, String>,
    failing_loads: HashSet<String>,
    failing_saves: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PortResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PortError::Unexpected("in-memory store lock poisoned".to_string()))
    }

    /// Raw JSON currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().ok()?.items.get(key).cloned()
    }

    /// Stores raw JSON under `key`, bypassing encoding.
    pub fn put_raw(&self, key: &str, json: &str) -> PortResult<()> {
        self.lock()?.items.insert(key.to_string(), json.to_string());
        Ok(())
    }

    /// Makes every subsequent load of `key` fail.
    pub fn fail_loads(&self, key: &str) -> PortResult<()> {
        self.lock()?.failing_loads.insert(key.to_string());
        Ok(())
    }

    /// Makes every subsequent save of `key` fail.
    pub fn fail_saves(&self, key: &str) -> PortResult<()> {
        self.lock()?.failing_saves.insert(key.to_string());
        Ok(())
    }

    /// Clears all injected failures.
    pub fn heal(&self) -> PortResult<()> {
        let mut inner = self.lock()?;
        inner.failing_loads.clear();
        inner.failing_saves.clear();
        Ok(())
    }

    fn get_item(&self, key: &str) -> PortResult<Option<String>> {
        let inner = self.lock()?;
        if inner.failing_loads.contains(key) {
            return Err(PortError::Storage(format!("load of {} failed", key)));
        }
        Ok(inner.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> PortResult<()> {
        let mut inner = self.lock()?;
        if inner.failing_saves.contains(key) {
            return Err(PortError::Storage(format!("save of {} failed", key)));
        }
        inner.items.insert(key.to_string(), value);
        Ok(())
    }
}

#[async_trait]
impl ReadingStore for InMemoryStore {
    async fn load_books(&self) -> PortResult<Vec<Book>> {
        match self.get_item(BOOKS_KEY)? {
            Some(json) => decode_books(&json),
            None => Ok(Vec::new()),
        }
    }

    async fn save_books(&self, books: &[Book]) -> PortResult<()> {
        self.set_item(BOOKS_KEY, encode_books(books)?)
    }

    async fn load_events(&self) -> PortResult<Vec<ReadingEvent>> {
        match self.get_item(EVENTS_KEY)? {
            Some(json) => decode_events(&json),
            None => Ok(Vec::new()),
        }
    }

    async fn save_events(&self, events: &[ReadingEvent]) -> PortResult<()> {
        self.set_item(EVENTS_KEY, encode_events(events)?)
    }
}

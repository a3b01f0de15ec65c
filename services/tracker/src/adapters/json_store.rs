//! services/tracker/src/adapters/json_store.rs
//!
//! This module contains the file-backed key-value adapter, which is the concrete
//! implementation of the `ReadingStore` port from the `core` crate. Each key is a
//! JSON document in the data directory, replaced atomically on every save.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reading_tracker_core::domain::{Book, ReadingEvent};
use reading_tracker_core::ports::{PortError, PortResult, ReadingStore};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::records::{decode_books, decode_events, encode_books, encode_events, BOOKS_KEY, EVENTS_KEY};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A key-value store that keeps one JSON file per key.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a new `JsonFileStore` rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the data directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> PortResult<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            PortError::Storage(format!("cannot create {}: {}", self.dir.display(), e))
        })?;
        info!("Using data directory {}", self.dir.display());
        Ok(())
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Returns `None` when the key has never been written.
    async fn get_item(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored value for {}", key);
                Ok(None)
            }
            Err(e) => Err(PortError::Storage(format!("cannot read {}: {}", path.display(), e))),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key);
        atomic_write(&path, value)
            .await
            .map_err(|e| PortError::Storage(format!("cannot write {}: {}", path.display(), e)))?;
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }
}

/// Writes to a sibling `.tmp` file, syncs it, then renames it over `path`,
/// so readers see either the old or the new document and never a partial one.
async fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, path).await
}

//=========================================================================================
// `ReadingStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReadingStore for JsonFileStore {
    async fn load_books(&self) -> PortResult<Vec<Book>> {
        match self.get_item(BOOKS_KEY).await? {
            Some(json) => decode_books(&json),
            None => Ok(Vec::new()),
        }
    }

    async fn save_books(&self, books: &[Book]) -> PortResult<()> {
        self.set_item(BOOKS_KEY, &encode_books(books)?).await
    }

    async fn load_events(&self) -> PortResult<Vec<ReadingEvent>> {
        match self.get_item(EVENTS_KEY).await? {
            Some(json) => decode_events(&json),
            None => Ok(Vec::new()),
        }
    }

    async fn save_events(&self, events: &[ReadingEvent]) -> PortResult<()> {
        self.set_item(EVENTS_KEY, &encode_events(events)?).await
    }
}

use crate::{
    CoreResult, KeyValueStore, NotesError, RecordingEntry,
    store::schema::{decode, encode},
};

use std::{
    panic::Location,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use error_location::ErrorLocation;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Fixed key the recording list is stored under.
pub const DEFAULT_STORE_KEY: &str = "recordings";

/// Canonical recording list, kept equal to its durable copy.
///
/// # Consistency
///
/// Mutations build the next list, persist it, and only then publish it to
/// readers. A failed write leaves the in-memory list at the last durable
/// state, so [`entries`](Self::entries) always matches what a fresh
/// [`load`](Self::load) returns.
///
/// # Thread Safety
///
/// All mutating operations are serialized through a single-writer async
/// mutex held across the persist call. Readers take a short synchronous read
/// lock and never wait on I/O.
pub struct RecordingStore<K> {
    backend: K,
    key: String,
    entries: RwLock<Vec<RecordingEntry>>,
    writer: Mutex<()>,
}

impl<K: KeyValueStore> RecordingStore<K> {
    /// Open the store under [`DEFAULT_STORE_KEY`] and load its contents.
    pub async fn open(backend: K) -> CoreResult<Self> {
        Self::open_with_key(backend, DEFAULT_STORE_KEY).await
    }

    /// Open the store under `key` and load its contents.
    ///
    /// # Errors
    ///
    /// `CorruptState` if the stored list cannot be parsed, or the backend's
    /// read error.
    #[instrument(skip(backend))]
    pub async fn open_with_key(backend: K, key: &str) -> CoreResult<Self> {
        let store = Self {
            backend,
            key: key.to_string(),
            entries: RwLock::new(Vec::new()),
            writer: Mutex::new(()),
        };

        store.load().await?;

        Ok(store)
    }

    /// Reload the list from durable storage.
    ///
    /// A missing key loads as an empty list. On error the in-memory list is
    /// left untouched.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> CoreResult<Vec<RecordingEntry>> {
        let _writer = self.writer.lock().await;

        let loaded = match self.backend.get(&self.key).await? {
            Some(raw) => decode(&raw)?,
            None => Vec::new(),
        };

        *self.write_entries() = loaded.clone();

        info!(count = loaded.len(), "Recordings loaded");

        Ok(loaded)
    }

    /// Append `entry` and persist the updated list.
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` if the id is already stored (nothing is written), or
    /// `PersistFailed` if the write fails (the list is unchanged).
    #[instrument(skip(self, entry), fields(entry_id = %entry.id))]
    pub async fn append(&self, entry: RecordingEntry) -> CoreResult<()> {
        let _writer = self.writer.lock().await;

        let mut next = self.read_entries().clone();

        if next.iter().any(|e| e.id == entry.id) {
            return Err(NotesError::DuplicateEntry {
                id: entry.id,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        next.push(entry);
        self.commit(next).await?;

        debug!("Recording appended");

        Ok(())
    }

    /// Remove the entry with `id` and persist the result.
    ///
    /// Removing an id that is not stored is not an error. Returns whether an
    /// entry was removed.
    ///
    /// # Errors
    ///
    /// `PersistFailed` if the write fails (the list is unchanged).
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> CoreResult<bool> {
        let _writer = self.writer.lock().await;

        let current = self.read_entries().clone();
        let before = current.len();
        let next: Vec<RecordingEntry> = current.into_iter().filter(|e| e.id != id).collect();
        let removed = next.len() != before;

        self.commit(next).await?;

        debug!(removed, "Recording removed");

        Ok(removed)
    }

    /// Entries whose date contains `term`, in insertion order.
    ///
    /// An empty term returns every entry.
    pub fn filter(&self, term: &str) -> Vec<RecordingEntry> {
        self.read_entries()
            .iter()
            .filter(|e| e.matches(term))
            .cloned()
            .collect()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> Vec<RecordingEntry> {
        self.read_entries().clone()
    }

    /// Look up one entry by id.
    pub fn get(&self, id: &str) -> Option<RecordingEntry> {
        self.read_entries().iter().find(|e| e.id == id).cloned()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Persist `next`, then publish it. Caller must hold the writer lock.
    async fn commit(&self, next: Vec<RecordingEntry>) -> CoreResult<()> {
        let serialized = encode(&next)?;

        if let Err(e) = self.backend.set(&self.key, serialized).await {
            error!(error = %e, "Failed to persist recordings, keeping last durable list");
            return Err(e);
        }

        *self.write_entries() = next;

        Ok(())
    }

    // A poisoned lock still holds a complete list: writers replace the Vec
    // in a single assignment.
    fn read_entries(&self) -> RwLockReadGuard<'_, Vec<RecordingEntry>> {
        self.entries.read().unwrap_or_else(|e| {
            error!("Recording list lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, Vec<RecordingEntry>> {
        self.entries.write().unwrap_or_else(|e| {
            error!("Recording list lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

use crate::{
    AudioBackend, CoreResult, DEFAULT_DATE_FORMAT, DEFAULT_STORE_KEY, KeyValueStore, NotesError,
    RecordingEntry, RecordingSession, RecordingStore, SessionEvent,
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Settings for [`VoiceNotes::open`].
#[derive(Debug, Clone)]
pub struct NotesOptions {
    /// Key the recording list is stored under.
    pub store_key: String,
    /// `chrono` format for entry dates.
    pub date_format: String,
}

impl Default for NotesOptions {
    fn default() -> Self {
        Self {
            store_key: DEFAULT_STORE_KEY.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Result of [`VoiceNotes::toggle_recording`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A capture started.
    Started,
    /// A capture finished and its entry was stored.
    Saved(RecordingEntry),
}

/// One recording session plus the store it feeds.
///
/// Construct once at startup and share through an `Arc`. The session sits
/// behind an async mutex, so concurrent toggles run one after the other and
/// can never begin two captures.
pub struct VoiceNotes<A, K> {
    audio: Arc<A>,
    session: Mutex<RecordingSession<A>>,
    store: RecordingStore<K>,
}

impl<A: AudioBackend, K: KeyValueStore> VoiceNotes<A, K> {
    /// Load stored recordings and prepare an idle session.
    ///
    /// # Errors
    ///
    /// Any error from loading the store.
    #[instrument(skip(audio, kv))]
    pub async fn open(audio: A, kv: K, options: NotesOptions) -> CoreResult<Self> {
        let store = RecordingStore::open_with_key(kv, &options.store_key).await?;

        let audio = Arc::new(audio);
        let session =
            RecordingSession::new(Arc::clone(&audio)).with_date_format(options.date_format);
        session.seed_ids(store.entries().iter().map(|e| e.id.as_str()));

        info!(count = store.len(), "Voice notes ready");

        Ok(Self {
            audio,
            session: Mutex::new(session),
            store,
        })
    }

    /// Start a capture, or stop the active one and store its entry.
    ///
    /// # Errors
    ///
    /// Session errors from start/stop, or store errors from appending the new
    /// entry. The session is idle after any stop, even a failed one. A
    /// `PersistFailed` here names the uri of the audio that was kept.
    #[instrument(skip(self))]
    pub async fn toggle_recording(&self) -> CoreResult<ToggleOutcome> {
        let mut session = self.session.lock().await;

        match session.toggle().await? {
            SessionEvent::Started => Ok(ToggleOutcome::Started),
            SessionEvent::Finished(entry) => {
                if let Err(e) = self.store.append(entry.clone()).await {
                    error!(
                        entry_id = %entry.id,
                        uri = %entry.uri,
                        error = %e,
                        "Captured audio was not added to the list"
                    );
                    return Err(match e {
                        NotesError::PersistFailed { reason, location } => {
                            NotesError::PersistFailed {
                                reason: format!("{}; the audio was kept at {}", reason, entry.uri),
                                location,
                            }
                        }
                        other => other,
                    });
                }
                Ok(ToggleOutcome::Saved(entry))
            }
        }
    }

    /// Delete the entry with `id`. Returns whether one was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> CoreResult<bool> {
        self.store.remove(id).await
    }

    /// Play the entry with `id`.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` if no entry has that id, or the backend's playback
    /// error.
    #[instrument(skip(self))]
    pub async fn play(&self, id: &str) -> CoreResult<()> {
        let entry = self.store.get(id).ok_or_else(|| NotesError::EntryNotFound {
            id: id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.audio.play(&entry.uri).await?;

        info!(entry_id = %entry.id, "Playback started");

        Ok(())
    }

    /// Entries whose date contains `term`.
    pub fn search(&self, term: &str) -> Vec<RecordingEntry> {
        self.store.filter(term)
    }

    /// All entries in recording order.
    pub fn entries(&self) -> Vec<RecordingEntry> {
        self.store.entries()
    }

    /// Discard the in-memory list and reload it from durable storage.
    ///
    /// Reloaded ids also seed the id generator, so ids written elsewhere are
    /// never reused.
    pub async fn reload(&self) -> CoreResult<Vec<RecordingEntry>> {
        let entries = self.store.load().await?;
        self.session
            .lock()
            .await
            .seed_ids(entries.iter().map(|e| e.id.as_str()));
        Ok(entries)
    }

    /// Whether a capture is active.
    ///
    /// Waits for an in-flight toggle to finish.
    pub async fn is_recording(&self) -> bool {
        self.session.lock().await.is_recording()
    }

    /// How long the active capture has been running.
    pub async fn recording_elapsed(&self) -> Option<Duration> {
        self.session.lock().await.elapsed()
    }

    /// The underlying store.
    pub fn store(&self) -> &RecordingStore<K> {
        &self.store
    }
}

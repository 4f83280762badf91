use crate::{
    AudioBackend, CaptureHandle, CoreResult, NotesError,
    recording::{DEFAULT_DATE_FORMAT, EntryIdGenerator, RecordingEntry, entry::local_timestamp},
};

use std::{
    panic::Location,
    sync::Arc,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};

/// Capture lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture in progress.
    Idle,
    /// Capturing audio.
    Recording {
        /// Backend handle of the active capture.
        handle: CaptureHandle,
        /// When the capture started.
        started_at: Instant,
    },
}

/// What a [`RecordingSession::toggle`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A capture started.
    Started,
    /// A capture finished and produced this entry.
    Finished(RecordingEntry),
}

/// Mediates start and stop of at most one audio capture.
///
/// # Thread Safety
///
/// Operations take `&mut self`; share a session behind a mutex so that a
/// second toggle waits for the first to complete.
pub struct RecordingSession<A> {
    backend: Arc<A>,
    state: SessionState,
    permission_granted: bool,
    ids: EntryIdGenerator,
    date_format: String,
}

impl<A: AudioBackend> RecordingSession<A> {
    /// Create an idle session over `backend`.
    pub fn new(backend: Arc<A>) -> Self {
        Self {
            backend,
            state: SessionState::Idle,
            permission_granted: false,
            ids: EntryIdGenerator::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Use a custom `chrono` format for entry dates.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a capture is active.
    pub fn is_recording(&self) -> bool {
        matches!(self.state, SessionState::Recording { .. })
    }

    /// How long the active capture has been running.
    pub fn elapsed(&self) -> Option<Duration> {
        match self.state {
            SessionState::Recording { started_at, .. } => Some(started_at.elapsed()),
            SessionState::Idle => None,
        }
    }

    /// Ensure new ids never collide with `existing` ones.
    pub fn seed_ids<'a, I>(&self, existing: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.ids.seed(existing);
    }

    /// Start a capture.
    ///
    /// Requests microphone permission the first time. The session stays
    /// idle on any error.
    ///
    /// # Errors
    ///
    /// `AlreadyRecording` if a capture is active, `PermissionDenied` if the
    /// user declines, or the backend's error if the capture cannot begin.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> CoreResult<()> {
        if self.is_recording() {
            return Err(NotesError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !self.permission_granted {
            if !self.backend.request_permission().await? {
                warn!("Microphone permission denied");
                return Err(NotesError::PermissionDenied {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            self.permission_granted = true;
        }

        let handle = self.backend.begin_capture().await?;

        self.state = SessionState::Recording {
            handle,
            started_at: Instant::now(),
        };

        info!(session_id = %handle, "Recording started");

        Ok(())
    }

    /// Stop the active capture and build its entry.
    ///
    /// The session returns to idle whether or not finalization succeeds.
    ///
    /// # Errors
    ///
    /// `NotRecording` if idle, or the backend's error if finalization fails
    /// (no entry is produced).
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<RecordingEntry> {
        let SessionState::Recording { handle, started_at } = self.state else {
            return Err(NotesError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.state = SessionState::Idle;

        let uri = self.backend.end_capture(handle).await?;
        let entry = RecordingEntry::new(
            self.ids.next_id(),
            uri,
            local_timestamp(&self.date_format),
        );

        info!(
            session_id = %handle,
            entry_id = %entry.id,
            duration_ms = started_at.elapsed().as_millis(),
            "Recording stopped"
        );

        Ok(entry)
    }

    /// Stop if recording, otherwise start.
    #[instrument(skip(self))]
    pub async fn toggle(&mut self) -> CoreResult<SessionEvent> {
        if self.is_recording() {
            self.stop().await.map(SessionEvent::Finished)
        } else {
            self.start().await.map(|()| SessionEvent::Started)
        }
    }
}

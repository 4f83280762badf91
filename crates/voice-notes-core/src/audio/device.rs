use crate::{
    AudioBackend, CaptureHandle, CoreResult, NotesError,
    audio::{
        AudioThreadHandle,
        wav::{read_wav, recording_file_name, write_wav},
    },
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};

/// Audio backend on the default cpal input and output devices.
///
/// Captures are buffered in memory and written as mono 16-bit WAV files into
/// the recordings directory when they end; the file path is the uri.
///
/// Desktop platforms have no runtime permission prompt. Permission counts as
/// granted when a default input device exists and reports a usable config;
/// the OS may still prompt on the first stream.
pub struct CpalAudioBackend {
    thread: AudioThreadHandle,
    recordings_dir: PathBuf,
}

impl CpalAudioBackend {
    /// Create a backend storing recordings in `recordings_dir`.
    ///
    /// Spawns the audio thread; no device is opened until first use.
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            thread: AudioThreadHandle::spawn(),
            recordings_dir: recordings_dir.into(),
        }
    }

    /// Directory new recordings are written to.
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }
}

#[track_caller]
fn join_error(e: tokio::task::JoinError) -> NotesError {
    NotesError::CaptureFailed {
        reason: format!("Audio file task failed: {}", e),
        location: ErrorLocation::from(Location::caller()),
    }
}

impl AudioBackend for CpalAudioBackend {
    #[instrument(skip(self))]
    async fn request_permission(&self) -> CoreResult<bool> {
        let granted = self.thread.probe().await?;
        if granted {
            info!("Microphone available");
        }
        Ok(granted)
    }

    #[instrument(skip(self))]
    async fn begin_capture(&self) -> CoreResult<CaptureHandle> {
        let handle = CaptureHandle::new();
        self.thread.start(handle.session_id()).await?;
        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn end_capture(&self, handle: CaptureHandle) -> CoreResult<String> {
        let captured = self.thread.stop(handle.session_id()).await?;

        if captured.truncated {
            warn!(session_id = %handle, "Recording was truncated at the buffer limit");
        }

        let dir = self.recordings_dir.clone();
        let file_name = recording_file_name(handle.session_id());

        let path = tokio::task::spawn_blocking(move || {
            write_wav(&dir, &file_name, &captured.samples, captured.sample_rate)
        })
        .await
        .map_err(join_error)??;

        Ok(path.to_string_lossy().into_owned())
    }

    #[instrument(skip(self))]
    async fn play(&self, uri: &str) -> CoreResult<()> {
        let path = PathBuf::from(uri);

        let (samples, sample_rate) = tokio::task::spawn_blocking(move || read_wav(&path))
            .await
            .map_err(join_error)??;

        self.thread.play(samples, sample_rate).await
    }
}

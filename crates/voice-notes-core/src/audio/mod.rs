pub(crate) mod capture;
mod device;
pub(crate) mod playback;
mod resampler;
mod thread;
pub(crate) mod wav;

pub(crate) use {
    capture::AudioCapturer, playback::AudioPlayer, resampler::Resampler,
    thread::AudioThreadHandle,
};

pub use device::CpalAudioBackend;

use crate::CoreResult;

use std::{fmt, future::Future};

use uuid::Uuid;

/// Opaque handle to one in-progress capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureHandle {
    session_id: Uuid,
}

impl CaptureHandle {
    /// Mint a handle for a new capture session.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
        }
    }

    /// Session id used for log correlation and file naming.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl Default for CaptureHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CaptureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.session_id)
    }
}

/// Platform audio recording and playback service.
///
/// The core never deals with encoding, device selection or file formats;
/// those belong to the implementation. `end_capture` returns the locator of
/// the finalized resource, which is stored verbatim as the entry's `uri`.
pub trait AudioBackend: Send + Sync {
    /// Ask for microphone access. `Ok(false)` means the user declined.
    fn request_permission(&self) -> impl Future<Output = CoreResult<bool>> + Send;

    /// Begin writing audio to a new resource.
    fn begin_capture(&self) -> impl Future<Output = CoreResult<CaptureHandle>> + Send;

    /// Finalize the capture identified by `handle` and return its uri.
    fn end_capture(&self, handle: CaptureHandle)
    -> impl Future<Output = CoreResult<String>> + Send;

    /// Play the resource at `uri`.
    fn play(&self, uri: &str) -> impl Future<Output = CoreResult<()>> + Send;
}

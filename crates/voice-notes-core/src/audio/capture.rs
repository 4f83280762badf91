use crate::{CoreResult, NotesError};

use std::{
    fmt::Display,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Maximum interleaved samples to buffer (10 minutes of 48kHz stereo).
///
/// **Memory footprint at max capacity:**
/// - 48,000 Hz * 2 ch * 60s * 10 min * 4 bytes/f32 = ~230MB
/// - Samples past the cap are dropped and the capture is marked truncated
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 2 * 60 * 10;

/// Mono audio produced by one capture.
#[derive(Debug, Clone)]
pub(crate) struct CapturedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) truncated: bool,
}

/// Microphone capture on the default input device.
///
/// Holds a cpal `Stream`, so it must stay on the audio thread.
pub(crate) struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    samples: Arc<Mutex<Vec<f32>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after `stop()`
    /// takes the buffer.
    shutdown: Arc<AtomicBool>,
    truncated: Arc<AtomicBool>,
}

#[track_caller]
fn capture_error(reason: String) -> NotesError {
    NotesError::CaptureFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl AudioCapturer {
    #[track_caller]
    #[instrument]
    pub(crate) fn new() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| capture_error("No microphone found".to_string()))?;

        let config = device
            .default_input_config()
            .map_err(|e| capture_error(format!("Failed to get input config: {}", e)))?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            samples: Arc::new(Mutex::new(Vec::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
            truncated: Arc::new(AtomicBool::new(false)),
        })
    }

    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn start(&mut self) -> CoreResult<()> {
        if self.stream.is_some() {
            return Err(NotesError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);
        let truncated = Arc::clone(&self.truncated);

        self.shutdown.store(false, Ordering::Release);
        self.truncated.store(false, Ordering::Release);

        samples
            .lock()
            .map_err(|e| capture_error(format!("Failed to lock samples: {}", e)))?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    let room = MAX_BUFFER_SAMPLES.saturating_sub(buf.len());
                    if data.len() > room {
                        truncated.store(true, Ordering::Release);
                    }
                    buf.extend_from_slice(&data[..data.len().min(room)]);
                },
                |err| {
                    error!("Audio input stream error: {}", err);
                },
                None,
            )
            .map_err(|e| capture_error(format!("Failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| capture_error(format!("Failed to start input stream: {}", e)))?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn stop(&mut self) -> CoreResult<CapturedAudio> {
        self.shutdown.store(true, Ordering::Release);

        let Some(stream) = self.stream.take() else {
            return Err(NotesError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };
        drop(stream);
        // Let a final in-flight callback observe the shutdown flag on backends
        // whose Stream::drop returns before the audio thread joins.
        std::thread::sleep(std::time::Duration::from_millis(5));
        info!("Audio capture stopped");

        let interleaved = std::mem::take(
            &mut *self
                .samples
                .lock()
                .map_err(|e| capture_error(format!("Failed to lock samples: {}", e)))?,
        );

        let truncated = self.truncated.load(Ordering::Acquire);
        if truncated {
            warn!(
                max_samples = MAX_BUFFER_SAMPLES,
                "Capture hit the buffer limit, trailing audio dropped"
            );
        }

        let samples = downmix(&interleaved, usize::from(self.config.channels));

        debug!(
            interleaved_len = interleaved.len(),
            sample_count = samples.len(),
            "Captured audio samples"
        );

        Ok(CapturedAudio {
            samples,
            sample_rate: self.config.sample_rate,
            truncated,
        })
    }
}

/// Whether the default input device exists and reports a usable config.
///
/// Opens no stream.
pub(crate) fn input_available() -> bool {
    let host = cpal::default_host();
    input_usable(
        host.default_input_device()
            .map(|device| device.default_input_config()),
    )
}

/// Verdict for a device lookup: `None` when there is no default input
/// device, otherwise the result of querying its config.
pub(crate) fn input_usable<C, E: Display>(lookup: Option<Result<C, E>>) -> bool {
    match lookup {
        None => {
            warn!("No default input device");
            false
        }
        Some(Err(e)) => {
            warn!(error = %e, "Default input device reports no usable config");
            false
        }
        Some(Ok(_)) => true,
    }
}

/// Average interleaved frames down to one channel.
///
/// A trailing partial frame is dropped.
pub(crate) fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

use crate::{CoreResult, NotesError, audio::Resampler};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Plays mono clips on the default output device.
///
/// Holds a cpal `Stream`, so it must stay on the audio thread. Starting a
/// new clip replaces the one playing.
#[derive(Default)]
pub(crate) struct AudioPlayer {
    stream: Option<Stream>,
    finished: Arc<AtomicBool>,
}

#[track_caller]
fn playback_error(reason: String) -> NotesError {
    NotesError::CaptureFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl AudioPlayer {
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub(crate) fn play(&mut self, samples: Vec<f32>, sample_rate: u32) -> CoreResult<()> {
        self.stop();

        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| playback_error("No output device found".to_string()))?;

        let supported = device
            .default_output_config()
            .map_err(|e| playback_error(format!("Failed to get output config: {}", e)))?;

        let output_rate = supported.sample_rate();
        let channels = usize::from(supported.channels());
        let config: StreamConfig = supported.into();

        let source = if output_rate != sample_rate {
            Resampler::new(sample_rate, output_rate)?.resample(&samples)?
        } else {
            samples
        };

        debug!(
            source_rate = sample_rate,
            output_rate,
            channels,
            frames = source.len(),
            "Playback configured"
        );

        let finished = Arc::new(AtomicBool::new(false));
        let callback_finished = Arc::clone(&finished);
        let mut position = 0usize;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if fill_frames(data, channels, &source, &mut position) {
                        callback_finished.store(true, Ordering::Release);
                    }
                },
                |err| {
                    error!("Audio output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| playback_error(format!("Failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| playback_error(format!("Failed to start output stream: {}", e)))?;

        self.stream = Some(stream);
        self.finished = finished;
        info!("Playback started");

        Ok(())
    }

    /// Release the output stream once the clip has drained.
    pub(crate) fn reap(&mut self) {
        if self.stream.is_some() && self.finished.load(Ordering::Acquire) {
            self.stream = None;
            debug!("Playback finished");
        }
    }

    pub(crate) fn stop(&mut self) {
        if self.stream.take().is_some() {
            debug!("Playback stopped");
        }
    }
}

/// Copy the next frames of a mono `source` into interleaved `out`,
/// duplicating each sample across `channels`. Pads with silence past the
/// end. Returns `true` once the source is exhausted.
pub(crate) fn fill_frames(
    out: &mut [f32],
    channels: usize,
    source: &[f32],
    position: &mut usize,
) -> bool {
    let channels = channels.max(1);

    for frame in out.chunks_mut(channels) {
        let sample = source.get(*position).copied().unwrap_or(0.0);
        frame.fill(sample);
        if *position < source.len() {
            *position += 1;
        }
    }

    *position >= source.len()
}

use crate::{CoreResult, NotesError};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Mono sample-rate converter used to match a recording to the output device.
pub(crate) struct Resampler {
    inner: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
}

#[track_caller]
fn playback_error(reason: String) -> NotesError {
    NotesError::CaptureFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub(crate) fn new(input_rate: u32, output_rate: u32) -> CoreResult<Self> {
        let inner = Fft::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            CHUNK_SIZE,
            SUB_CHUNKS,
            1,
            FixedSync::Input,
        )
        .map_err(|e| playback_error(format!("Failed to create resampler: {}", e)))?;

        debug!(input_rate, output_rate, "Playback resampler initialized");

        Ok(Self {
            inner,
            input_rate,
            output_rate,
        })
    }

    /// Convert a whole clip. Output length is scaled by the rate ratio.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub(crate) fn resample(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let expected_len =
            (samples.len() as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let mut output = Vec::with_capacity(expected_len);
        let mut input_chunk = vec![0.0f32; CHUNK_SIZE];
        let mut output_chunk = vec![0.0f32; self.inner.output_frames_max()];

        for chunk in samples.chunks(CHUNK_SIZE) {
            // Zero-pad the final partial chunk
            input_chunk[..chunk.len()].copy_from_slice(chunk);
            input_chunk[chunk.len()..].fill(0.0);

            let written = {
                let input_adapter = InterleavedSlice::new(&input_chunk, 1, CHUNK_SIZE).map_err(
                    |e| playback_error(format!("Failed to create input adapter: {}", e)),
                )?;

                let output_frames = output_chunk.len();
                let mut output_adapter =
                    InterleavedSlice::new_mut(&mut output_chunk, 1, output_frames).map_err(
                        |e| playback_error(format!("Failed to create output adapter: {}", e)),
                    )?;

                let (_consumed, written) = self
                    .inner
                    .process_into_buffer(&input_adapter, &mut output_adapter, None)
                    .map_err(|e| playback_error(format!("Resampling failed: {}", e)))?;
                written
            };

            output.extend_from_slice(&output_chunk[..written]);
        }

        output.truncate(expected_len);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled clip for playback"
        );

        Ok(output)
    }
}

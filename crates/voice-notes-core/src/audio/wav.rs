//! WAV files backing each voice note.

use crate::{CoreResult, NotesError, audio::capture::downmix};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::Local;
use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{debug, info, instrument};
use uuid::Uuid;

#[track_caller]
fn wav_error(reason: String) -> NotesError {
    NotesError::CaptureFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// File name for the recording of capture `session_id`.
pub(crate) fn recording_file_name(session_id: Uuid) -> String {
    let simple = session_id.simple().to_string();
    format!(
        "voice-note-{}-{}.wav",
        Local::now().format("%Y%m%d-%H%M%S"),
        &simple[..8]
    )
}

/// Encode mono `samples` as 16-bit PCM into `dir`, creating it if needed.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// `CaptureFailed` if the clip is empty or the file cannot be written.
#[track_caller]
#[instrument(skip(samples))]
pub(crate) fn write_wav(
    dir: &Path,
    file_name: &str,
    samples: &[f32],
    sample_rate: u32,
) -> CoreResult<PathBuf> {
    if samples.is_empty() {
        return Err(wav_error("No audio captured".to_string()));
    }

    std::fs::create_dir_all(dir)
        .map_err(|e| wav_error(format!("Failed to create recordings directory: {}", e)))?;

    let path = dir.join(file_name);
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(&path, spec)
        .map_err(|e| wav_error(format!("Failed to create WAV file: {}", e)))?;

    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(scaled)
            .map_err(|e| wav_error(format!("Failed to write WAV sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| wav_error(format!("Failed to finalize WAV file: {}", e)))?;

    info!(
        path = ?path,
        sample_count = samples.len(),
        sample_rate,
        "Recording saved"
    );

    Ok(path)
}

/// Decode a WAV file to mono f32 samples and its sample rate.
///
/// # Errors
///
/// `CaptureFailed` if the file is missing or not a readable WAV.
#[track_caller]
#[instrument]
pub(crate) fn read_wav(path: &Path) -> CoreResult<(Vec<f32>, u32)> {
    let reader = WavReader::open(path)
        .map_err(|e| wav_error(format!("Failed to open {}: {}", path.display(), e)))?;

    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| wav_error(format!("Failed to decode WAV samples: {}", e)))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| wav_error(format!("Failed to decode WAV samples: {}", e)))?
        }
    };

    let samples = downmix(&interleaved, usize::from(spec.channels));

    debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        sample_count = samples.len(),
        "Recording decoded"
    );

    Ok((samples, spec.sample_rate))
}

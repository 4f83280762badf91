use crate::{
    NotesError,
    audio::wav::{read_wav, recording_file_name, write_wav},
};

use uuid::Uuid;

/// WHAT: A written recording reads back at its rate with matching samples
/// WHY: Playback decodes exactly what capture encoded
#[test]
fn given_samples_when_written_then_read_back_within_quantization() {
    // Given: A short ramp at 16kHz
    let dir = tempfile::tempdir().unwrap();
    let samples: Vec<f32> = (0..1600).map(|i| (i as f32 / 1600.0) - 0.5).collect();

    // When: Writing and reading the file
    let path = write_wav(dir.path(), "note.wav", &samples, 16_000).unwrap();
    let (decoded, rate) = read_wav(&path).unwrap();

    // Then: Same rate, same length, 16-bit quantization error only
    assert_eq!(rate, 16_000);
    assert_eq!(decoded.len(), samples.len());
    assert!(
        decoded
            .iter()
            .zip(&samples)
            .all(|(d, s)| (d - s).abs() < 1.0 / 16_000.0)
    );
}

/// WHAT: Out-of-range samples are clipped, not wrapped
/// WHY: Wrapping overflow produces loud clicks
#[test]
fn given_clipping_samples_when_written_then_clamped_to_full_scale() {
    // Given: Samples beyond full scale
    let dir = tempfile::tempdir().unwrap();

    // When: Writing and reading
    let path = write_wav(dir.path(), "loud.wav", &[2.0, -2.0], 8_000).unwrap();
    let (decoded, _) = read_wav(&path).unwrap();

    // Then: Values sit at the rails
    assert!(decoded[0] > 0.99);
    assert!(decoded[1] < -0.99);
}

/// WHAT: Empty captures produce no file
/// WHY: A zero-length note is a capture failure
#[test]
fn given_no_samples_when_writing_then_capture_failed() {
    // Given: An empty clip
    let dir = tempfile::tempdir().unwrap();

    // When: Writing
    let result = write_wav(dir.path(), "empty.wav", &[], 16_000);

    // Then: CaptureFailed and no file
    assert!(matches!(result, Err(NotesError::CaptureFailed { .. })));
    assert!(!dir.path().join("empty.wav").exists());
}

/// WHAT: Reading a missing file fails
/// WHY: A deleted audio file must be reported on play
#[test]
fn given_missing_file_when_reading_then_capture_failed() {
    // Given/When: Reading a path that does not exist
    let result = read_wav(std::path::Path::new("/nonexistent/voice-note.wav"));

    // Then: CaptureFailed
    assert!(matches!(result, Err(NotesError::CaptureFailed { .. })));
}

/// WHAT: File names are unique per session and end in .wav
/// WHY: Two notes in the same second must not overwrite each other
#[test]
fn given_two_sessions_when_naming_files_then_names_differ() {
    // Given: Two session ids
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    // When: Naming their files
    let name_a = recording_file_name(a);
    let name_b = recording_file_name(b);

    // Then: Distinct, prefixed and with the wav extension
    assert_ne!(name_a, name_b);
    assert!(name_a.starts_with("voice-note-"));
    assert!(name_a.ends_with(".wav"));
}

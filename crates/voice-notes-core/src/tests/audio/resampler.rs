use crate::audio::Resampler;

// Test constants
const DEVICE_RATE: u32 = 48_000;
const RECORDING_RATE: u32 = 44_100;
const LENGTH_TOLERANCE: u64 = 100;

/// WHAT: A 44.1kHz clip converts to roughly one second at 48kHz
/// WHY: Playback must keep pitch and duration on devices at another rate
#[test]
fn given_44k_clip_when_resampling_to_48k_then_length_scaled() {
    // Given: One second of a quiet tone at 44.1kHz
    let mut resampler = Resampler::new(RECORDING_RATE, DEVICE_RATE).unwrap();
    let input: Vec<f32> = (0..RECORDING_RATE as usize)
        .map(|i| (i as f32 * 0.05).sin() * 0.5)
        .collect();

    // When: Resampling
    let output = resampler.resample(&input).unwrap();

    // Then: About 48,000 finite samples
    assert!(
        (output.len() as i64 - DEVICE_RATE as i64).unsigned_abs() < LENGTH_TOLERANCE,
        "Expected ~{} samples, got {}",
        DEVICE_RATE,
        output.len()
    );
    assert!(output.iter().all(|s| s.is_finite()));
}

/// WHAT: An empty clip resamples to nothing
/// WHY: Edge case for zero-length recordings
#[test]
fn given_empty_clip_when_resampling_then_empty_output() {
    // Given: A resampler and no samples
    let mut resampler = Resampler::new(RECORDING_RATE, DEVICE_RATE).unwrap();

    // When/Then: Output is empty
    assert!(resampler.resample(&[]).unwrap().is_empty());
}

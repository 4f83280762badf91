use crate::audio::capture::{MAX_BUFFER_SAMPLES, downmix, input_usable};

/// WHAT: Stereo frames are averaged into mono
/// WHY: Recordings are stored as single-channel WAV
#[test]
fn given_stereo_samples_when_downmixing_then_frames_averaged() {
    // Given: Three interleaved stereo frames
    let interleaved = [1.0f32, 0.0, 0.5, 0.5, -1.0, 1.0];

    // When: Downmixing two channels
    let mono = downmix(&interleaved, 2);

    // Then: One averaged sample per frame
    assert_eq!(mono, vec![0.5, 0.5, 0.0]);
}

/// WHAT: A trailing partial frame is dropped
/// WHY: A torn frame has no complete set of channels to average
#[test]
fn given_partial_trailing_frame_when_downmixing_then_dropped() {
    // Given: Two stereo frames plus one stray sample
    let interleaved = [0.2f32, 0.4, 0.6, 0.8, 0.9];

    // When: Downmixing
    let mono = downmix(&interleaved, 2);

    // Then: Only complete frames are kept
    assert_eq!(mono.len(), 2);
}

/// WHAT: Mono input passes through unchanged
/// WHY: No averaging is needed for single-channel devices
#[test]
fn given_mono_samples_when_downmixing_then_unchanged() {
    // Given: Mono samples
    let samples = [0.1f32, -0.2, 0.3];

    // When/Then: Downmixing one channel (or a bogus zero) is the identity
    assert_eq!(downmix(&samples, 1), samples.to_vec());
    assert_eq!(downmix(&samples, 0), samples.to_vec());
}

/// WHAT: The capture cap holds ten minutes of 48kHz stereo
/// WHY: Voice notes longer than a few minutes must not be truncated
#[test]
fn given_buffer_limit_when_inspected_then_ten_minutes_of_stereo() {
    // Given/When/Then: 48k frames/s * 2 channels * 600 s
    assert_eq!(MAX_BUFFER_SAMPLES, 48_000 * 2 * 600);
}

/// WHAT: A missing input device means permission is not granted
/// WHY: The session reports PermissionDenied, not a capture failure
#[test]
fn given_no_input_device_when_checking_permission_then_denied() {
    // Given: No default input device
    let lookup: Option<Result<(), String>> = None;

    // When/Then: Not usable
    assert!(!input_usable(lookup));
}

/// WHAT: A device whose config query fails is treated as unavailable
/// WHY: A stream could not be opened on it either
#[test]
fn given_device_without_config_when_checking_permission_then_denied() {
    // Given: A device that reports no usable config
    let lookup: Option<Result<(), String>> = Some(Err("device busy".to_string()));

    // When/Then: Not usable
    assert!(!input_usable(lookup));
}

/// WHAT: A device with a config grants permission
/// WHY: Capture can start on it
#[test]
fn given_device_with_config_when_checking_permission_then_granted() {
    // Given: A device reporting a config
    let lookup: Option<Result<u32, String>> = Some(Ok(48_000));

    // When/Then: Usable
    assert!(input_usable(lookup));
}

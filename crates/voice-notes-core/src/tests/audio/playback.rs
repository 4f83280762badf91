use crate::audio::playback::fill_frames;

/// WHAT: Mono samples are duplicated across output channels
/// WHY: Output devices are usually stereo
#[test]
fn given_stereo_output_when_filling_then_each_sample_duplicated() {
    // Given: A mono clip and a stereo buffer of two frames
    let source = [0.25f32, -0.5, 0.75];
    let mut out = [9.0f32; 4];
    let mut position = 0;

    // When: Filling once
    let done = fill_frames(&mut out, 2, &source, &mut position);

    // Then: Two frames written, clip not yet exhausted
    assert_eq!(out, [0.25, 0.25, -0.5, -0.5]);
    assert_eq!(position, 2);
    assert!(!done);
}

/// WHAT: Frames past the end of the clip are silent
/// WHY: Stale buffer contents must never be played
#[test]
fn given_clip_end_when_filling_then_silence_and_done() {
    // Given: A clip with one sample left
    let source = [0.1f32, 0.2];
    let mut out = [9.0f32; 6];
    let mut position = 1;

    // When: Filling three stereo frames
    let done = fill_frames(&mut out, 2, &source, &mut position);

    // Then: Last sample then silence, and playback reports done
    assert_eq!(out, [0.2, 0.2, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(position, 2);
    assert!(done);
}

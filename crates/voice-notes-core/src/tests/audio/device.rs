use crate::{AudioBackend, CpalAudioBackend};

use std::time::Duration;

/// WHAT: A real capture on the default microphone produces a WAV file
/// WHY: Verifies the cpal thread, buffering and file finalization together
#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn given_microphone_when_capturing_briefly_then_wav_written() {
    // Given: A backend writing into a temp directory
    let dir = tempfile::tempdir().unwrap();
    let backend = CpalAudioBackend::new(dir.path());
    assert!(backend.request_permission().await.unwrap());

    // When: Capturing for half a second
    let handle = backend.begin_capture().await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let uri = backend.end_capture(handle).await.unwrap();

    // Then: The uri names a file inside the recordings directory
    let path = std::path::PathBuf::from(&uri);
    assert!(path.starts_with(dir.path()));
    assert!(path.exists());
}

/// WHAT: Playing a missing file fails without touching the device
/// WHY: Decoding happens before the output stream is opened
#[tokio::test]
async fn given_missing_file_when_playing_then_error() {
    // Given: A backend
    let dir = tempfile::tempdir().unwrap();
    let backend = CpalAudioBackend::new(dir.path());

    // When: Playing a file that does not exist
    let result = backend.play("/nonexistent/voice-note.wav").await;

    // Then: An error is returned
    assert!(result.is_err());
}

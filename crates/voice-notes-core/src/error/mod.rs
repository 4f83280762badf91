use error_location::ErrorLocation;
use thiserror::Error;

/// Voice note errors with source location tracking.
#[derive(Error, Debug)]
pub enum NotesError {
    /// The user declined the microphone permission prompt.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The audio backend failed to start, finalize or play a capture.
    #[error("Capture failed: {reason} {location}")]
    CaptureFailed {
        /// Description of the device or file error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing the recording list to durable storage failed.
    #[error("Persist failed: {reason} {location}")]
    PersistFailed {
        /// Description of the write error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The stored recording list could not be parsed.
    #[error("Stored recordings are corrupt: {reason} {location}")]
    CorruptState {
        /// What was wrong with the stored data.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading from durable storage failed.
    #[error("Storage unavailable: {reason} {location}")]
    StorageUnavailable {
        /// Description of the read error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A capture was requested while another one is active.
    #[error("A recording is already in progress {location}")]
    AlreadyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A stop was requested with no active capture.
    #[error("No recording in progress {location}")]
    NotRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An entry with the same id is already stored.
    #[error("Recording {id} already exists {location}")]
    DuplicateEntry {
        /// The conflicting entry id.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No stored entry has the requested id.
    #[error("Recording {id} not found {location}")]
    EntryNotFound {
        /// The requested entry id.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A storage key contains characters that cannot name a file.
    #[error("Invalid storage key {key:?} {location}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`NotesError`].
pub type Result<T> = std::result::Result<T, NotesError>;

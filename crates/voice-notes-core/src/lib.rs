//! Voice Notes Core Library
//!
//! Recording lifecycle and persisted-list synchronization for short audio
//! notes. Audio devices and durable storage are reached through the
//! [`AudioBackend`] and [`KeyValueStore`] contracts; [`CpalAudioBackend`] and
//! [`FileKeyValueStore`] are the production implementations.
//!
//! # Example
//!
//! ```no_run
//! use voice_notes_core::{
//!     CpalAudioBackend, CoreResult, FileKeyValueStore, NotesOptions, ToggleOutcome, VoiceNotes,
//! };
//!
//! use std::{thread::sleep, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let audio = CpalAudioBackend::new("recordings");
//!     let kv = FileKeyValueStore::new("data");
//!     let notes = VoiceNotes::open(audio, kv, NotesOptions::default()).await?;
//!
//!     notes.toggle_recording().await?;
//!     sleep(Duration::from_secs(3));
//!     if let ToggleOutcome::Saved(entry) = notes.toggle_recording().await? {
//!         println!("Saved {} at {}", entry.id, entry.date);
//!     }
//!     Ok(())
//! }
//! ```

mod audio;
mod error;
mod notes;
mod recording;
mod store;

pub use {
    audio::{AudioBackend, CaptureHandle, CpalAudioBackend},
    error::NotesError,
    error::Result as CoreResult,
    notes::{NotesOptions, ToggleOutcome, VoiceNotes},
    recording::{
        DEFAULT_DATE_FORMAT, EntryIdGenerator, RecordingEntry, RecordingSession, SessionEvent,
        SessionState,
    },
    store::{
        CURRENT_SCHEMA_VERSION, DEFAULT_STORE_KEY, FileKeyValueStore, KeyValueStore,
        RecordingStore,
    },
};

#[cfg(test)]
mod tests;

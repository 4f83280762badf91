mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod logging_config;
mod storage_config;

pub(crate) use {
    audio_config::AudioConfig, behaviour_config::BehaviourConfig, config::Config,
    logging_config::LoggingConfig, storage_config::StorageConfig,
};

use std::path::PathBuf;

use directories::ProjectDirs;
use voice_notes_core::{DEFAULT_DATE_FORMAT, DEFAULT_STORE_KEY};

pub(crate) const DEFAULT_LOG_FILTER: &str = "voice_notes=debug,voice_notes_core=debug";

/// Fallback root when the platform has no home directory (e.g. bare containers).
const FALLBACK_DIR: &str = "voice-notes-data";

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "voice-notes", "Voice-Notes")
}

pub(crate) fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
}

pub(crate) fn default_recordings_dir() -> PathBuf {
    default_data_dir().join("recordings")
}

pub(crate) fn default_log_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR).join("logs"))
}

pub(crate) fn default_store_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

pub(crate) fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

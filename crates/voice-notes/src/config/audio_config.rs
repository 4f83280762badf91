use crate::config::default_recordings_dir;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Audio file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Directory new WAV recordings are written to.
    #[serde(default = "default_recordings_dir")]
    pub recordings_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
        }
    }
}

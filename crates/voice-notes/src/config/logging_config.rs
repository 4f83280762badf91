use crate::config::{default_log_dir, default_log_filter};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env filter directive.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Directory for the daily log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            log_dir: default_log_dir(),
        }
    }
}

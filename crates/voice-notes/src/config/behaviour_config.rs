use crate::config::default_date_format;

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// `chrono` format for the date shown on, and searched in, each note.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

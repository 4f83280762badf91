use crate::config::{default_data_dir, default_store_key};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the recording list is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Key the recording list is stored under.
    #[serde(default = "default_store_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_store_key(),
        }
    }
}

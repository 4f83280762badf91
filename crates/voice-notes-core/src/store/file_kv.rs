//! File-backed key-value store.
//!
//! Each key maps to `<data_dir>/<key>.json`. Writes go to a temporary file
//! that is synced and then renamed over the target, so a crash mid-write
//! leaves the previous value intact.

use crate::{CoreResult, KeyValueStore, NotesError};

use std::{
    io::ErrorKind,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

/// Key-value store keeping one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    data_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Store values under `data_dir`. The directory is created on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the value files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[track_caller]
    fn value_path(&self, key: &str) -> CoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(NotesError::InvalidKey {
                key: key.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let path = self.value_path(key)?;

        match fs::read_to_string(&path).await {
            Ok(contents) => {
                debug!(path = ?path, bytes = contents.len(), "Value read");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?path, "No stored value");
                Ok(None)
            }
            Err(e) => Err(NotesError::StorageUnavailable {
                reason: format!("Failed to read {}: {}", path.display(), e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> CoreResult<()> {
        let path = self.value_path(key)?;

        let persist_error = |action: &str, e: std::io::Error| NotesError::PersistFailed {
            reason: format!("Failed to {}: {}", action, e),
            location: ErrorLocation::from(Location::caller()),
        };

        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| persist_error("create data directory", e))?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("json.tmp");

        let written = async {
            let mut temp_file = fs::File::create(&temp_path)
                .await
                .map_err(|e| persist_error("create temp file", e))?;

            temp_file
                .write_all(value.as_bytes())
                .await
                .map_err(|e| persist_error("write temp file", e))?;

            temp_file
                .sync_all()
                .await
                .map_err(|e| persist_error("sync temp file", e))?;

            drop(temp_file);

            fs::rename(&temp_path, &path)
                .await
                .map_err(|e| persist_error("rename temp file to final", e))
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = ?temp_path, error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(e);
        }

        info!(path = ?path, bytes = value.len(), "Value saved (atomic write)");

        Ok(())
    }
}

mod file_kv;
mod kv;
mod recording_store;
pub(crate) mod schema;

pub use {
    file_kv::FileKeyValueStore,
    kv::KeyValueStore,
    recording_store::{DEFAULT_STORE_KEY, RecordingStore},
    schema::CURRENT_SCHEMA_VERSION,
};

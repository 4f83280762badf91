//! Versioned serialized form of the recording list.
//!
//! Version 1 wraps the entries in an envelope:
//! `{"schemaVersion":1,"recordings":[{"id":..,"uri":..,"date":..}]}`.
//! A bare JSON array of entries is the unversioned legacy layout and decodes
//! as version 0.

use crate::{CoreResult, NotesError, RecordingEntry};

use std::{collections::HashSet, panic::Location};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    schema_version: u32,
    recordings: &'a [RecordingEntry],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    schema_version: u32,
    recordings: Vec<RecordingEntry>,
}

#[track_caller]
fn corrupt(reason: String) -> NotesError {
    NotesError::CorruptState {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Serialize `entries` in the current schema.
#[track_caller]
pub(crate) fn encode(entries: &[RecordingEntry]) -> CoreResult<String> {
    serde_json::to_string(&EnvelopeRef {
        schema_version: CURRENT_SCHEMA_VERSION,
        recordings: entries,
    })
    .map_err(|e| NotesError::PersistFailed {
        reason: format!("Failed to serialize recordings: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Parse a stored value, accepting the legacy array layout.
///
/// # Errors
///
/// `CorruptState` on malformed JSON, an unknown or newer schema version, or
/// duplicate entry ids.
#[track_caller]
pub(crate) fn decode(raw: &str) -> CoreResult<Vec<RecordingEntry>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| corrupt(format!("Stored value is not valid JSON: {}", e)))?;

    let entries = match value {
        Value::Array(_) => {
            let entries: Vec<RecordingEntry> = serde_json::from_value(value)
                .map_err(|e| corrupt(format!("Malformed legacy recording list: {}", e)))?;
            warn!(
                count = entries.len(),
                "Loaded unversioned recording list, will upgrade on next write"
            );
            entries
        }
        Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(value)
                .map_err(|e| corrupt(format!("Malformed recording list: {}", e)))?;

            if envelope.schema_version > CURRENT_SCHEMA_VERSION {
                return Err(corrupt(format!(
                    "Schema version {} is newer than supported version {}",
                    envelope.schema_version, CURRENT_SCHEMA_VERSION
                )));
            }

            debug!(
                schema_version = envelope.schema_version,
                count = envelope.recordings.len(),
                "Decoded recording list"
            );
            envelope.recordings
        }
        other => {
            return Err(corrupt(format!(
                "Expected a recording list, found {}",
                json_kind(&other)
            )));
        }
    };

    let mut seen = HashSet::with_capacity(entries.len());
    if let Some(dup) = entries.iter().find(|e| !seen.insert(e.id.as_str())) {
        return Err(corrupt(format!("Duplicate recording id {}", dup.id)));
    }

    Ok(entries)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

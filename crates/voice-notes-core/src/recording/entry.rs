use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Default `chrono` format for the human-readable entry date.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted voice note.
///
/// Entries are created by a finished capture and never mutated afterwards.
/// `date` doubles as the search key for [`RecordingStore::filter`].
///
/// [`RecordingStore::filter`]: crate::RecordingStore::filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingEntry {
    /// Unique, time-derived identifier.
    pub id: String,
    /// Locator of the audio resource owned by the audio backend.
    pub uri: String,
    /// Human-readable creation timestamp.
    pub date: String,
}

impl RecordingEntry {
    /// Build an entry from its parts.
    pub fn new(id: impl Into<String>, uri: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
            date: date.into(),
        }
    }

    /// Whether the entry's date contains `term` (case-sensitive, unanchored).
    pub fn matches(&self, term: &str) -> bool {
        self.date.contains(term)
    }
}

/// Format the current local time for an entry's `date` field.
///
/// Falls back to [`DEFAULT_DATE_FORMAT`] when `format` has an invalid
/// specifier.
pub(crate) fn local_timestamp(format: &str) -> String {
    let now = Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", now.format(DEFAULT_DATE_FORMAT));
    }
    out
}

/// Issues monotonic millisecond ids.
///
/// Ids follow wall-clock milliseconds, but never repeat or go backwards: if
/// the clock has not advanced since the last id (or was set back), the next
/// id is `last + 1`.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    last: AtomicU64,
}

impl EntryIdGenerator {
    /// Create a generator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future ids sort after every numeric id in `existing`.
    ///
    /// Non-numeric ids are ignored; they can never collide with the decimal
    /// ids this generator produces.
    pub fn seed<'a, I>(&self, existing: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let max = existing
            .into_iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.last.fetch_max(max, Ordering::AcqRel);
    }

    /// Produce the next id.
    pub fn next_id(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate.to_string(),
                Err(observed) => last = observed,
            }
        }
    }
}

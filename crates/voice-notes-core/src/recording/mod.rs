pub(crate) mod entry;
mod session;

pub use {
    entry::{DEFAULT_DATE_FORMAT, EntryIdGenerator, RecordingEntry},
    session::{RecordingSession, SessionEvent, SessionState},
};

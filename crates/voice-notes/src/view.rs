//! Text rendering of the recorder state and the note list.

use std::fmt::Write;

use voice_notes_core::RecordingEntry;

/// Record button label while idle.
pub const LABEL_IDLE: &str = "New Voice Note";
/// Record button label while capturing.
pub const LABEL_RECORDING: &str = "Stop Recording";

/// Presentation state: just the search filter. Notes come from the core.
#[derive(Debug, Default)]
pub struct NotesView {
    search_term: String,
}

impl NotesView {
    /// Current search term (empty when unfiltered).
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Replace the search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Render the record button and the already-filtered `entries`.
    pub fn render(&self, entries: &[RecordingEntry], recording: bool) -> String {
        let mut out = String::new();

        let label = if recording {
            LABEL_RECORDING
        } else {
            LABEL_IDLE
        };
        let _ = write!(out, "[ {} ]", label);
        if !self.search_term.is_empty() {
            let _ = write!(out, "  search: {:?}", self.search_term);
        }
        out.push('\n');

        if entries.is_empty() {
            out.push_str(if self.search_term.is_empty() {
                "  (no voice notes yet)\n"
            } else {
                "  (no voice notes match)\n"
            });
            return out;
        }

        let id_width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0);
        for entry in entries {
            let _ = writeln!(out, "  {:<id_width$}  {}", entry.id, entry.date);
        }

        out
    }
}

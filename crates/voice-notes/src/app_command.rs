use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands sent from the input handler to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new voice note, or stop the current one.
    ToggleRecording,
    /// Show the list under the current filter.
    List,
    /// Replace the search filter. An empty term clears it.
    Search {
        /// Substring to look for in note dates.
        term: String,
    },
    /// Play a note.
    Play {
        /// Id of the note to play.
        id: String,
    },
    /// Delete a note.
    Delete {
        /// Id of the note to delete.
        id: String,
    },
    /// Reload the list from storage.
    Reload,
    /// Show the command summary.
    Help,
    /// Request application shutdown.
    Shutdown,
}

/// Command summary shown by `help`.
pub const HELP: &str = "\
Commands:
  record | r          start or stop a voice note
  list | ls           show notes matching the current search
  search | s <term>   filter notes by date (no term clears the filter)
  play | p <id>       play a note
  delete | rm <id>    delete a note
  reload              reload notes from storage
  help | ?            show this summary
  quit | q | exit     leave";

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let require_id = |usage: &str| -> Result<String, AppError> {
            match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [id] => Ok((*id).to_string()),
                _ => Err(AppError::InvalidCommand {
                    reason: format!("Usage: {} <id>", usage),
                    location: ErrorLocation::from(Location::caller()),
                }),
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "record" | "r" => Ok(AppCommand::ToggleRecording),
            "list" | "ls" => Ok(AppCommand::List),
            "search" | "s" => Ok(AppCommand::Search {
                term: rest.to_string(),
            }),
            "play" | "p" => Ok(AppCommand::Play {
                id: require_id("play")?,
            }),
            "delete" | "rm" => Ok(AppCommand::Delete {
                id: require_id("delete")?,
            }),
            "reload" => Ok(AppCommand::Reload),
            "help" | "?" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Shutdown),
            other => Err(AppError::InvalidCommand {
                reason: format!("Unknown command {:?}, type `help` for a list", other),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

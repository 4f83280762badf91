use crate::{AppCommand, AppError, AppResult, NotesView, app_command::HELP};

use std::{io::Write, sync::Arc};

use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use voice_notes_core::{AudioBackend, KeyValueStore, NotesError, ToggleOutcome, VoiceNotes};

/// Main application state.
///
/// Owns the presentation state and drives the shared [`VoiceNotes`] from
/// commands sent by the input handler. Everything the user sees is printed
/// from here.
pub struct App<A, K> {
    pub(crate) notes: Arc<VoiceNotes<A, K>>,
    pub(crate) view: NotesView,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<A: AudioBackend, K: KeyValueStore> App<A, K> {
    /// Create an app with an unfiltered view.
    pub(crate) fn new(
        notes: Arc<VoiceNotes<A, K>>,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            notes,
            view: NotesView::default(),
            command_rx,
            shutdown_tx,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice notes starting");

        println!("{}", self.render().await);
        prompt();

        while let Some(cmd) = self.command_rx.recv().await {
            if cmd == AppCommand::Shutdown {
                info!("Shutdown requested");
                break;
            }

            match self.handle(cmd).await {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    error!(error = ?e, "Command failed");
                    println!("! {}", user_message(&e));
                    println!("{}", self.render().await);
                }
            }
            prompt();
        }

        if self.notes.is_recording().await {
            warn!("Exiting with a recording in progress, stopping it");
            match self.notes.toggle_recording().await {
                Ok(ToggleOutcome::Saved(entry)) => println!("Saved voice note {}", entry.id),
                Ok(ToggleOutcome::Started) => {}
                Err(e) => error!(error = ?e, "Failed to finish recording on exit"),
            }
        }

        let _ = self.shutdown_tx.send(true);
        info!("Voice notes shut down successfully");

        Ok(())
    }

    /// Apply one command and return the text to show.
    ///
    /// `Shutdown` is handled by the loop and only renders here.
    #[instrument(skip(self))]
    pub(crate) async fn handle(&mut self, cmd: AppCommand) -> AppResult<String> {
        let notice = match cmd {
            AppCommand::ToggleRecording => match self.notes.toggle_recording().await? {
                ToggleOutcome::Started => {
                    "Recording... enter `r` again to stop.".to_string()
                }
                ToggleOutcome::Saved(entry) => {
                    info!(entry_id = %entry.id, uri = %entry.uri, "Voice note saved");
                    format!("Saved voice note {} ({})", entry.id, entry.date)
                }
            },
            AppCommand::List | AppCommand::Shutdown => String::new(),
            AppCommand::Search { term } => {
                self.view.set_search_term(term);
                String::new()
            }
            AppCommand::Play { id } => {
                self.notes.play(&id).await?;
                format!("Playing {}", id)
            }
            AppCommand::Delete { id } => {
                if self.notes.delete(&id).await? {
                    format!("Deleted {}", id)
                } else {
                    format!("No voice note with id {}", id)
                }
            }
            AppCommand::Reload => {
                let entries = self.notes.reload().await?;
                format!("Reloaded {} voice notes", entries.len())
            }
            AppCommand::Help => return Ok(HELP.to_string()),
        };

        let view = self.render().await;
        Ok(if notice.is_empty() {
            view
        } else {
            format!("{}\n{}", notice, view)
        })
    }

    /// Current view of the filtered list.
    pub(crate) async fn render(&self) -> String {
        let entries = self.notes.search(self.view.search_term());
        let recording = self.notes.is_recording().await;
        self.view.render(&entries, recording)
    }
}

/// Short text for a failed command, without source locations.
pub(crate) fn user_message(err: &AppError) -> String {
    match err {
        AppError::Notes { source, .. } => match source {
            NotesError::PermissionDenied { .. } => {
                "Microphone access was denied, recording not started.".to_string()
            }
            NotesError::CaptureFailed { reason, .. } => format!("Recording problem: {}", reason),
            NotesError::PersistFailed { reason, .. } => format!(
                "Could not save voice notes ({}). The list shows what is stored.",
                reason
            ),
            NotesError::CorruptState { reason, .. } => {
                format!("Stored voice notes are unreadable: {}", reason)
            }
            NotesError::StorageUnavailable { reason, .. } => {
                format!("Could not read voice notes: {}", reason)
            }
            NotesError::AlreadyRecording { .. } => "Already recording.".to_string(),
            NotesError::NotRecording { .. } => "Not recording.".to_string(),
            NotesError::DuplicateEntry { id, .. } => {
                format!("A voice note with id {} already exists", id)
            }
            NotesError::EntryNotFound { id, .. } => format!("No voice note with id {}", id),
            NotesError::InvalidKey { key, .. } => format!("Invalid storage key {:?}", key),
        },
        AppError::InvalidCommand { reason, .. } => reason.clone(),
        AppError::ConfigError { reason, .. } => reason.clone(),
        AppError::ChannelSendFailed { message, .. } => message.clone(),
        AppError::IoError { source, .. } => source.to_string(),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

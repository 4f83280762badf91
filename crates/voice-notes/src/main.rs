//! Voice Notes: record, list, search and play short voice notes from a
//! terminal prompt.

mod app;
mod app_command;
mod config;
mod error;
mod input_handler;
mod logging;
#[cfg(test)]
mod tests;
mod view;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
    view::NotesView,
};

use crate::config::Config;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use voice_notes_core::{CpalAudioBackend, FileKeyValueStore, NotesError, VoiceNotes};

/// Application entry point.
fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Dropping the guard flushes the log writer, so it lives until exit.
    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            eprintln!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(config)) {
        error!(error = ?e, "Voice notes failed to start");
        eprintln!("{}", app::user_message(&e));
        if let AppError::Notes {
            source: NotesError::CorruptState { .. },
            ..
        } = e
        {
            eprintln!("The stored list was left untouched for manual repair.");
        }
        std::process::exit(1);
    }
}

/// Open the notes and run the input handler and app until quit.
async fn run(config: Config) -> AppResult<()> {
    info!(
        data_dir = ?config.storage.data_dir,
        recordings_dir = ?config.audio.recordings_dir,
        "Opening voice notes"
    );

    let audio = CpalAudioBackend::new(&config.audio.recordings_dir);
    let kv = FileKeyValueStore::new(&config.storage.data_dir);
    let notes = Arc::new(VoiceNotes::open(audio, kv, config.notes_options()).await?);

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let input_handler = InputHandler::new(command_tx);
    let app = App::new(notes, command_rx, shutdown_tx);

    tokio::join!(
        async {
            if let Err(e) = input_handler.run(shutdown_rx).await {
                error!(error = ?e, "Input handler error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    Ok(())
}

//! Terminal input handler.
//!
//! Reads prompt lines from stdin, parses them into [`AppCommand`]s and
//! forwards them to the main application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards parsed prompt lines to the application.
pub struct InputHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputHandler {
    /// Create a handler sending commands on `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the input loop until shutdown is signalled or stdin closes.
    ///
    /// End of input is treated as a quit request.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single persistent blocking task that forwards stdin lines.
        //
        // Shutdown: when line_rx is dropped (loop breaks), the next
        // line_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input handler shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("Input closed, requesting shutdown");
                        self.send(AppCommand::Shutdown).await?;
                        break;
                    };
                    if let Some(command) = Self::parse_line(&line) {
                        let quit = command == AppCommand::Shutdown;
                        self.send(command).await?;
                        if quit {
                            break;
                        }
                    }
                }
            }
        }

        drop(line_rx);

        // Best-effort join: the blocking task may be stuck in a stdin read.
        // The task is cleaned up by the runtime on process exit regardless.
        match tokio::time::timeout(Duration::from_millis(200), handle).await {
            Ok(Ok(())) => debug!("Input forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Input forwarder task panicked"),
            Err(_) => debug!("Input forwarder still blocked on stdin, will be cleaned up on exit"),
        }

        Ok(())
    }

    /// Parse one prompt line. Blank lines are ignored; invalid ones are
    /// reported to the user and skipped.
    fn parse_line(line: &str) -> Option<AppCommand> {
        if line.trim().is_empty() {
            return None;
        }

        match line.parse::<AppCommand>() {
            Ok(command) => Some(command),
            Err(e) => {
                debug!(error = ?e, "Rejected input");
                println!("! {}", e);
                None
            }
        }
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

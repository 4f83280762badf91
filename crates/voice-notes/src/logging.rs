//! Tracing setup: a daily rolling log file written off the hot path.

use crate::{AppError, AppResult, config::LoggingConfig};

use std::{fs, panic::Location};

use error_location::ErrorLocation;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file name prefix inside `log_dir`.
const LOG_FILE_PREFIX: &str = "voice-notes.log";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. The returned guard
/// flushes buffered lines when dropped and must live until exit.
#[track_caller]
pub(crate) fn init(config: &LoggingConfig) -> AppResult<WorkerGuard> {
    let filter = filter_for(config)?;

    fs::create_dir_all(&config.log_dir)?;
    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to install log subscriber: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(guard)
}

/// Env filter from `RUST_LOG`, else from the configured directive.
#[track_caller]
pub(crate) fn filter_for(config: &LoggingConfig) -> AppResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.filter).map_err(|e| AppError::ConfigError {
        reason: format!("Invalid log filter {:?}: {}", config.filter, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

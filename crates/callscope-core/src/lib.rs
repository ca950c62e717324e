//! Core types and utilities for callscope

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, LoggingConfig, PlaybackConfig, TimelineConfig};
pub use error::{Error, Result};
pub use types::{
    CallId, CallRecord, EventKind, EventMarker, ItemId, SegmentKind, Sentiment, Severity,
    Speaker, TimelineSegment, TranscriptLine,
};

pub use tracing_appender::non_blocking::WorkerGuard;

use std::path::Path;
use tracing_appender::{non_blocking::NonBlocking, rolling::Rotation};

/// Initialize the logging system
///
/// `RUST_LOG` wins over the configured level. The format is `json` or
/// anything else for pretty output; when a file is configured, events are
/// appended there by a background writer instead of going to stderr.
///
/// Hold the returned guard until exit so buffered file output is flushed.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global
/// subscriber is already installed.
pub fn init_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(env_filter);
    let json = logging.format.eq_ignore_ascii_case("json");

    let (result, guard) = match &logging.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let result = if json {
                registry
                    .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                    .try_init()
            } else {
                registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(writer),
                    )
                    .try_init()
            };
            (result, Some(guard))
        }
        None if json => (
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init(),
            None,
        ),
        None => (
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init(),
            None,
        ),
    };

    result.map_err(|e| Error::configuration(format!("failed to initialize logging: {e}")))?;
    Ok(guard)
}

/// Non-rotating, non-blocking appender for `path`
fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            Error::configuration(format!("log file {} has no file name", path.display()))
        })?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| {
            Error::configuration(format!("failed to open log file {}: {e}", path.display()))
        })?;
    Ok(tracing_appender::non_blocking(appender))
}

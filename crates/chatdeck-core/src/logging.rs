//! File logging.
//!
//! The TUI owns the terminal, so logs go to a daily-rolling file under the
//! configured directory. `RUST_LOG` overrides the configured level.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// File name prefix; the appender adds the date suffix.
pub const LOG_FILE_PREFIX: &str = "chatdeck.log";

/// Builds the filter: `RUST_LOG` first, then the configured level.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level directive: {}", config.level))
}

/// Installs the global subscriber.
///
/// Returns `None` when logging is disabled. The guard must be kept alive for
/// buffered lines to be flushed.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    if !config.enabled {
        return Ok(None);
    }

    let dir = config.effective_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log dir {}", dir.display()))?;

    let filter = build_filter(config)?;
    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(Some(guard))
}

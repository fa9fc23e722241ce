//! File logging. The terminal belongs to the UI, so nothing goes to stdout.

use color_eyre::eyre::{eyre, WrapErr};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(log_file: &Path) -> color_eyre::Result<WorkerGuard> {
    let log_dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let log_filename = log_file
        .file_name()
        .ok_or_else(|| eyre!("log file path {} has no file name", log_file.display()))?;
    fs::create_dir_all(log_dir)
        .wrap_err_with(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking)
        .try_init()
        .map_err(|e| eyre!("installing log subscriber: {}", e))?;

    Ok(guard)
}

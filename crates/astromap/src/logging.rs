//! Process-wide log setup: one file under the logs directory plus stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::error::AstroMapError;

pub const LOG_FILE_NAME: &str = "astromap.log";

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber and bridges `log` records into it.
/// Returns the path of the log file. Fails if called twice.
pub fn init_logging(logs_dir: &Path) -> Result<PathBuf, AstroMapError> {
    std::fs::create_dir_all(logs_dir).map_err(|e| AstroMapError::Io {
        path: logs_dir.to_path_buf(),
        source: e,
    })?;

    let log_path = logs_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| AstroMapError::Io {
            path: log_path.clone(),
            source: e,
        })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AstroMapError::Logging(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| AstroMapError::Logging(e.to_string()))?;

    log::info!("Logging to {}", log_path.display());
    Ok(log_path)
}

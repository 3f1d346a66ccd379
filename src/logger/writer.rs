//! Log writer module
//!
//! Installs the global `tracing` subscriber, writing either to stderr or to an
//! append-only log file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Where the installed global subscriber writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Set once the global subscriber is installed
static TARGET: OnceLock<LogTarget> = OnceLock::new();

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Returns an error if
/// the log file cannot be opened or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid log level '{}': {e}", config.level),
            )
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let (result, target) = match config.log_file.as_deref() {
        Some(path) => {
            let file = open_log_file(path)?;
            let result = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            (result, LogTarget::File)
        }
        None => (
            builder.with_writer(io::stderr).try_init(),
            LogTarget::Stderr,
        ),
    };

    result.map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;
    let _ = TARGET.set(target);
    Ok(())
}

/// Check if the global subscriber has been installed
pub fn is_initialized() -> bool {
    TARGET.get().is_some()
}

/// Check if log lines end up in a file rather than on the console
pub fn logs_to_file() -> bool {
    TARGET.get() == Some(&LogTarget::File)
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

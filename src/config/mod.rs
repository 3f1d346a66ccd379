// Configuration module entry point
// Loads the startup configuration and resolves the command-line overrides

mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ServeError;
use crate::logger;

// Re-export public types
pub use types::{
    Config, HttpConfig, LoggingConfig, ServerConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_ROOT,
};

/// Config file looked up when `--config` is not given (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "devserve";

impl Config {
    /// Load configuration from the given file path (without extension)
    ///
    /// Layering, lowest first: built-in defaults, the config file if it
    /// exists, then `DEVSERVE_*` environment variables such as
    /// `DEVSERVE_SERVER__PORT=8080`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", DEFAULT_ROOT)?
            .set_default("logging.level", types::DEFAULT_LOG_LEVEL)?
            .set_default("logging.access_log_format", types::DEFAULT_ACCESS_LOG_FORMAT)?
            .set_default("http.server_name", types::DEFAULT_SERVER_NAME)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServeError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ServeError::Config(config::ConfigError::Message(format!(
                    "Invalid address '{}:{}': {e}",
                    self.server.host, self.server.port
                )))
            })
    }
}

/// Resolve the listening port from the first positional argument
///
/// An argument that is not a valid port is reported and `fallback` is used.
pub fn resolve_port(arg: Option<&str>, fallback: u16) -> u16 {
    let Some(raw) = arg else {
        return fallback;
    };

    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            logger::log_warning(&format!("Invalid port number: {raw}"));
            logger::log_warning(&format!("Using default port: {fallback}"));
            fallback
        }
    }
}

/// Resolve the serving root from the second positional argument or the
/// configured root
///
/// The directory must exist; the returned path is canonical so every request
/// is resolved against the same absolute root.
pub fn resolve_root(arg: Option<&Path>, configured: &str) -> Result<PathBuf, ServeError> {
    let candidate = arg.map_or_else(|| PathBuf::from(configured), Path::to_path_buf);

    if !candidate.exists() {
        return Err(ServeError::RootNotFound(candidate));
    }

    candidate
        .canonicalize()
        .map_err(|_| ServeError::RootNotFound(candidate))
}

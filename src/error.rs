//! Error types
//!
//! Startup failures are fatal and end the process; per-request failures never
//! reach this type, they are answered with an HTTP status instead.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Port {port} is already in use")]
    AddrInUse { port: u16 },

    #[error("Error starting server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServeError>;

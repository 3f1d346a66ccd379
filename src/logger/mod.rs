//! Logger module
//!
//! Provides logging utilities for the dev server including:
//! - Subscriber setup (stderr or a log file)
//! - Server lifecycle logging
//! - Access logging, suppressed for 200 responses
//! - Fatal startup diagnostics

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use hyper::StatusCode;
use std::io::{self, Write};
use std::path::Path;

use crate::config::LoggingConfig;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(config)
}

/// Write to info log
fn write_info(message: &str) {
    if writer::is_initialized() {
        tracing::info!("{message}");
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        tracing::error!("{message}");
    } else {
        eprintln!("{message}");
    }
}

/// Whether a response with this status produces an access log entry
///
/// Only an exact 200 is silent; redirects, listings with other codes and all
/// errors are logged.
pub fn should_log(status: StatusCode) -> bool {
    status != StatusCode::OK
}

/// Log formatted access log entry unless the response was a plain 200
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let Ok(status) = StatusCode::from_u16(entry.status) else {
        return;
    };
    if !should_log(status) {
        return;
    }

    let line = entry.format(format);
    if status.is_server_error() {
        tracing::error!(target: "access", "{line}");
    } else if status.is_client_error() {
        tracing::warn!(target: "access", "{line}");
    } else {
        tracing::info!(target: "access", "{line}");
    }
}

pub fn log_server_start(port: u16, root: &Path) {
    write_info("======================================");
    write_info("devserve static file server");
    write_info(&format!("Serving directory: {}", root.display()));
    write_info(&format!("Server running at http://localhost:{port}/"));
    write_info("Press Ctrl+C to stop the server");
    write_info("======================================");
}

pub fn log_shutdown() {
    write_info("Server stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::debug!("Failed to serve connection: {err}");
}

pub fn log_error(message: &str) {
    if writer::is_initialized() {
        write_error(message);
    } else {
        eprintln!("[ERROR] {message}");
    }
}

pub fn log_warning(message: &str) {
    if writer::is_initialized() {
        tracing::warn!("{message}");
    } else {
        eprintln!("[WARN] {message}");
    }
}

/// Report an error that ends the process
///
/// Always printed on the console; also kept in the log file when one is
/// configured.
pub fn log_fatal(message: &str) {
    write_fatal(
        &mut io::stderr().lock(),
        &[format!("Error: {message}")],
        writer::logs_to_file(),
    );
}

/// Explain how to get past an occupied port
pub fn log_port_in_use(port: u16) {
    write_fatal(
        &mut io::stderr().lock(),
        &port_in_use_guidance(port),
        writer::logs_to_file(),
    );
}

fn port_in_use_guidance(port: u16) -> Vec<String> {
    vec![
        format!("Error: Port {port} is already in use"),
        "Try using a different port:".to_string(),
        format!("   devserve {}", port.saturating_add(1)),
        "   devserve 8000".to_string(),
        format!("Or stop the process using port {port}:"),
        format!("   lsof -ti:{port} | xargs kill"),
    ]
}

fn write_fatal(console: &mut impl Write, lines: &[String], mirror_to_log: bool) {
    for line in lines {
        let _ = writeln!(console, "{line}");
        if mirror_to_log {
            tracing::error!("{line}");
        }
    }
    let _ = console.flush();
}

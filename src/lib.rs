//! devserve - static file server for local development
//!
//! Serves a directory over HTTP/1.1, answers CORS preflight requests, stamps
//! every response with CORS and security headers and logs only non-200
//! responses.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::{Result, ServeError};

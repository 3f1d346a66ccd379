//! Request handler module
//!
//! - `static_files`: the static file handler
//! - `listing`: directory listing fallback

pub mod listing;
pub mod static_files;

pub use listing::{DirectoryLister, HtmlListing};
pub use static_files::{StaticFileHandler, INDEX_FILES};

//! HTTP protocol layer module
//!
//! Header finalization, MIME detection, path translation and response
//! builders, decoupled from the file-serving logic in `handler`.

pub mod headers;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use headers::{finalize_headers, http_date};
pub use mime::{content_type_for, ExtensionTable, MimeGuess, MimeLookup};
pub use path::translate_path;
pub use response::{
    build_404_response, build_501_response, build_file_response, build_html_response,
    build_preflight_response, build_redirect_response, empty_body, ResponseBody,
};

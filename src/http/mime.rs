//! MIME type detection module
//!
//! Content types are derived from the request URL, not from the file that is
//! finally served: `/` serves `index.html` but is typed by its URL.
//! A few suffixes are fixed ahead of the generic [`MimeLookup`].

/// Used when the generic lookup has nothing usable
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Best guess for one extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeGuess {
    pub essence: &'static str,
    /// Character-encoding hint, rendered as `; charset=...`
    pub charset: Option<&'static str>,
}

impl MimeGuess {
    pub const fn new(essence: &'static str) -> Self {
        Self {
            essence,
            charset: None,
        }
    }

    pub const fn text(essence: &'static str) -> Self {
        Self {
            essence,
            charset: Some("utf-8"),
        }
    }

    /// Value for the `Content-type` header
    pub fn header_value(&self) -> String {
        match self.charset {
            Some(charset) => format!("{}; charset={charset}", self.essence),
            None => self.essence.to_string(),
        }
    }
}

/// Extension to MIME type lookup
pub trait MimeLookup: Send + Sync {
    /// `extension` has no leading dot
    fn guess(&self, extension: &str) -> Option<MimeGuess>;
}

/// Built-in table of common web types
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionTable;

impl MimeLookup for ExtensionTable {
    fn guess(&self, extension: &str) -> Option<MimeGuess> {
        let guess = match extension.to_ascii_lowercase().as_str() {
            // Text
            "html" | "htm" => MimeGuess::new("text/html"),
            "css" => MimeGuess::new("text/css"),
            "txt" | "md" => MimeGuess::text("text/plain"),
            "csv" => MimeGuess::text("text/csv"),
            "xml" => MimeGuess::new("application/xml"),

            // JavaScript/WASM
            "js" | "mjs" => MimeGuess::new("application/javascript"),
            "json" | "map" => MimeGuess::new("application/json"),
            "webmanifest" => MimeGuess::new("application/manifest+json"),
            "wasm" => MimeGuess::new("application/wasm"),

            // Images
            "png" => MimeGuess::new("image/png"),
            "jpg" | "jpeg" => MimeGuess::new("image/jpeg"),
            "gif" => MimeGuess::new("image/gif"),
            "svg" => MimeGuess::new("image/svg+xml"),
            "ico" => MimeGuess::new("image/x-icon"),
            "webp" => MimeGuess::new("image/webp"),
            "avif" => MimeGuess::new("image/avif"),

            // Video
            "mp4" => MimeGuess::new("video/mp4"),
            "webm" => MimeGuess::new("video/webm"),
            "ogv" => MimeGuess::new("video/ogg"),

            // Audio
            "mp3" => MimeGuess::new("audio/mpeg"),
            "wav" => MimeGuess::new("audio/wav"),
            "ogg" => MimeGuess::new("audio/ogg"),

            // Fonts
            "woff" => MimeGuess::new("font/woff"),
            "woff2" => MimeGuess::new("font/woff2"),
            "ttf" => MimeGuess::new("font/ttf"),
            "otf" => MimeGuess::new("font/otf"),

            // Documents
            "pdf" => MimeGuess::new("application/pdf"),
            "zip" => MimeGuess::new("application/zip"),
            "gz" => MimeGuess::new("application/gzip"),

            _ => return None,
        };
        Some(guess)
    }
}

/// Content type for a request URL path
///
/// Precedence: `.js`, `.css`, then `.html` / trailing `/` / no extension as
/// `text/html`, then `lookup`, then [`FALLBACK_CONTENT_TYPE`]. Never empty.
pub fn content_type_for(url_path: &str, lookup: &dyn MimeLookup) -> String {
    if url_path.ends_with(".js") {
        return "application/javascript".to_string();
    }
    if url_path.ends_with(".css") {
        return "text/css".to_string();
    }
    if url_path.ends_with(".html") || url_path.ends_with('/') {
        return "text/html".to_string();
    }

    let Some(extension) = extension_of(url_path) else {
        return "text/html".to_string();
    };

    lookup
        .guess(extension)
        .filter(|guess| !guess.essence.is_empty())
        .map_or_else(|| FALLBACK_CONTENT_TYPE.to_string(), |guess| guess.header_value())
}

/// Extension of the last path segment, ignoring dotfiles like `.env`
fn extension_of(url_path: &str) -> Option<&str> {
    let segment = url_path.rsplit('/').next().unwrap_or(url_path);
    segment
        .rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext)
}

//! URL path to filesystem path translation

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Translate a URL path into a path below `root`
///
/// Query and fragment are dropped and percent-escapes decoded. `..` pops the
/// previous segment but never climbs above `root`; empty and `.` segments and
/// segments that are not a plain file name are skipped. A trailing slash is
/// kept, so `/file.txt/` does not open `file.txt`.
pub fn translate_path(root: &Path, url_path: &str) -> PathBuf {
    let path = url_path.split(['?', '#']).next().unwrap_or_default();
    let trailing_slash = path.trim_end().ends_with('/');
    let decoded = percent_decode_str(path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name if is_plain_name(name) => segments.push(name),
            _ => {}
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    if trailing_slash {
        resolved.push("");
    }
    resolved
}

/// A segment that joins as exactly one normal path component
fn is_plain_name(segment: &str) -> bool {
    if segment.contains('\\') {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

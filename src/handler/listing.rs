//! Directory listing fallback
//!
//! Used for a directory request that has no index file.

use async_trait::async_trait;
use hyper::Response;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;

use crate::http::{self, ResponseBody};
use crate::logger;

/// Characters left unescaped in listing links: unreserved plus `/`
const HREF_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Produces the response for a directory without an index file
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// `dir` is the resolved directory, `url_path` the request path as received
    async fn list(&self, dir: &Path, url_path: &str) -> Response<ResponseBody>;
}

/// HTML listing of the directory entries
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlListing;

struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

#[async_trait]
impl DirectoryLister for HtmlListing {
    async fn list(&self, dir: &Path, url_path: &str) -> Response<ResponseBody> {
        match read_entries(dir).await {
            Ok(entries) => http::build_html_response(render(url_path, &entries)),
            Err(e) => {
                logger::log_warning(&format!(
                    "Cannot list directory '{}': {e}",
                    dir.display()
                ));
                http::build_404_response("No permission to list directory")
            }
        }
    }
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(item) = reader.next_entry().await? {
        let is_symlink = item
            .file_type()
            .await
            .is_ok_and(|file_type| file_type.is_symlink());
        // Follows symlinks, so a link to a directory links with a slash
        let is_dir = tokio::fs::metadata(item.path())
            .await
            .is_ok_and(|meta| meta.is_dir());

        entries.push(Entry {
            name: item.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
    Ok(entries)
}

fn render(url_path: &str, entries: &[Entry]) -> String {
    let display_path = escape_html(&percent_decode_str(url_path).decode_utf8_lossy());
    let title = format!("Directory listing for {display_path}");

    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );

    for entry in entries {
        let mut link = entry.name.clone();
        let mut display = entry.name.clone();
        if entry.is_dir {
            link.push('/');
            display.push('/');
        }
        if entry.is_symlink {
            display = format!("{}@", entry.name);
        }

        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(&link, HREF_ESCAPE),
            escape_html(&display),
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

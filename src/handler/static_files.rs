//! Static file serving module
//!
//! Resolves request paths below the serving root, answers preflight requests
//! and stamps every response with the shared headers before it is logged.

use hyper::{Method, Request, Response, Uri};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;

use crate::config::Config;
use crate::handler::listing::{DirectoryLister, HtmlListing};
use crate::http::{self, ExtensionTable, MimeLookup, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Tried in order inside a directory
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Request handler bound to one serving root
///
/// Holds no per-request state and takes no locks, so one instance is shared
/// by every connection.
pub struct StaticFileHandler {
    root: PathBuf,
    server_name: String,
    access_log_format: String,
    mime: Arc<dyn MimeLookup>,
    lister: Arc<dyn DirectoryLister>,
}

impl StaticFileHandler {
    /// Create a handler serving `root` with the built-in MIME table and HTML
    /// directory listing
    pub fn new(root: PathBuf, config: &Config) -> Self {
        Self {
            root,
            server_name: config.http.server_name.clone(),
            access_log_format: config.logging.access_log_format.clone(),
            mime: Arc::new(ExtensionTable),
            lister: Arc::new(HtmlListing),
        }
    }

    #[must_use]
    pub fn with_mime_lookup(mut self, mime: Arc<dyn MimeLookup>) -> Self {
        self.mime = mime;
        self
    }

    #[must_use]
    pub fn with_lister(mut self, lister: Arc<dyn DirectoryLister>) -> Self {
        self.lister = lister;
        self
    }

    /// Main entry point for HTTP request handling
    ///
    /// Dispatches on the method, finalizes headers once, drops the body of
    /// HEAD responses and writes the access log entry.
    pub async fn handle<B>(
        &self,
        req: &Request<B>,
        remote_addr: Option<SocketAddr>,
    ) -> Response<ResponseBody> {
        let mut response = match *req.method() {
            Method::OPTIONS => http::build_preflight_response(),
            Method::GET | Method::HEAD => self.serve(req.uri()).await,
            ref method => http::build_501_response(method.as_str()),
        };

        http::finalize_headers(response.headers_mut(), &self.server_name);

        if req.method() == Method::HEAD {
            // Releases the file handle without reading it
            *response.body_mut() = http::empty_body();
        }

        let entry = AccessLogEntry::from_request(req, remote_addr).with_response(&response);
        logger::log_access(&entry, &self.access_log_format);

        response
    }

    /// Resolve and serve a GET/HEAD request
    pub async fn serve(&self, uri: &Uri) -> Response<ResponseBody> {
        let url_path = uri.path();
        let mut path = http::translate_path(&self.root, url_path);

        if is_dir(&path).await {
            if !url_path.ends_with('/') {
                return http::build_redirect_response(&redirect_location(uri));
            }
            match find_index(&path).await {
                Some(index) => path = index,
                None => return self.lister.list(&path, url_path).await,
            }
        }

        let Ok(file) = File::open(&path).await else {
            return http::build_404_response("File not found");
        };

        let metadata = match file.metadata().await {
            Ok(metadata) if !metadata.is_dir() => metadata,
            Ok(_) => return http::build_404_response("File not found"),
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to stat '{}': {e}",
                    path.display()
                ));
                return http::build_404_response("File not found");
            }
        };

        // Typed by the URL as requested, not by the file found for it
        let content_type = http::content_type_for(url_path, self.mime.as_ref());
        let last_modified = metadata.modified().ok().map(http::http_date);

        http::build_file_response(file, &content_type, metadata.len(), last_modified)
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
}

async fn find_index(dir: &Path) -> Option<PathBuf> {
    for name in INDEX_FILES {
        let candidate = dir.join(name);
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return Some(candidate);
        }
    }
    None
}

/// Same path with a trailing slash, query string kept
fn redirect_location(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}/?{query}", uri.path()),
        None => format!("{}/", uri.path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MimeGuess;
    use crate::logger::capture::CapturedLogs;
    use async_trait::async_trait;
    use http_body_util::BodyExt;
    use hyper::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_MAX_AGE, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION,
        SERVER, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
    };
    use hyper::StatusCode;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hello, world\n").unwrap();
        std::fs::write(dir.path().join("index.js"), "console.log(1);").unwrap();
        std::fs::write(dir.path().join("styles.css"), "body {}").unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir(dir.path().join("both")).unwrap();
        std::fs::write(dir.path().join("both/index.html"), "html").unwrap();
        std::fs::write(dir.path().join("both/index.htm"), "htm").unwrap();
        std::fs::create_dir(dir.path().join("legacy")).unwrap();
        std::fs::write(dir.path().join("legacy/index.htm"), "legacy").unwrap();
        std::fs::create_dir(dir.path().join("files")).unwrap();
        std::fs::write(dir.path().join("files/report.pdf"), "%PDF").unwrap();
        dir
    }

    fn handler(dir: &TempDir) -> StaticFileHandler {
        StaticFileHandler::new(dir.path().to_path_buf(), &Config::default())
    }

    fn request(method: &str, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    async fn get(handler: &StaticFileHandler, uri: &str) -> Response<ResponseBody> {
        handler.handle(&request("GET", uri), None).await
    }

    async fn body_string(response: Response<ResponseBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_shared_headers(response: &Response<ResponseBody>) {
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[X_XSS_PROTECTION], "1; mode=block");

        // Preflight answers carry their own CORS set before finalizing
        let cors_count = if headers.contains_key(ACCESS_CONTROL_MAX_AGE) { 2 } else { 1 };
        for name in [
            ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_HEADERS,
        ] {
            assert_eq!(headers.get_all(&name).iter().count(), cors_count, "{name}");
        }
        for name in [X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION, SERVER] {
            assert_eq!(headers.get_all(&name).iter().count(), 1, "{name}");
        }
    }

    #[tokio::test]
    async fn test_serves_file_with_exact_length() {
        let dir = site();
        let response = get(&handler(&dir), "/hello.txt").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "13");
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_shared_headers(&response);
        let last_modified = response.headers()[LAST_MODIFIED].to_str().unwrap().to_string();
        assert!(last_modified.ends_with(" GMT"));
        assert_eq!(body_string(response).await, "hello, world\n");
    }

    #[tokio::test]
    async fn test_head_keeps_headers_without_body() {
        let dir = site();
        let response = handler(&dir).handle(&request("HEAD", "/hello.txt"), None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "13");
        assert_shared_headers(&response);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_content_types_follow_url() {
        let dir = site();
        let handler = handler(&dir);

        let js = get(&handler, "/index.js").await;
        assert_eq!(js.headers()[CONTENT_TYPE], "application/javascript");
        let css = get(&handler, "/styles.css").await;
        assert_eq!(css.headers()[CONTENT_TYPE], "text/css");
        let root = get(&handler, "/").await;
        assert_eq!(root.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body_string(root).await, "<h1>home</h1>");
        let pdf = get(&handler, "/files/report.pdf").await;
        assert_eq!(pdf.headers()[CONTENT_TYPE], "application/pdf");
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let dir = site();
        let handler = handler(&dir);

        // With an index file
        let response = get(&handler, "/both").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/both/");
        assert_shared_headers(&response);
        assert_eq!(body_string(response).await, "");

        // Without an index file
        let response = get(&handler, "/files").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/files/");
    }

    #[tokio::test]
    async fn test_redirect_keeps_query() {
        let dir = site();
        let response = get(&handler(&dir), "/files?sort=name").await;
        assert_eq!(response.headers()[LOCATION], "/files/?sort=name");
    }

    #[tokio::test]
    async fn test_index_html_preferred() {
        let dir = site();
        let handler = handler(&dir);

        let response = get(&handler, "/both/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "html");

        let response = get(&handler, "/legacy/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body_string(response).await, "legacy");
    }

    #[tokio::test]
    async fn test_directory_without_index_is_listed() {
        let dir = site();
        let response = get(&handler(&dir), "/files/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_shared_headers(&response);
        let body = body_string(response).await;
        assert!(body.contains("Directory listing for /files/"));
        assert!(body.contains("report.pdf"));
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = site();
        let handler = handler(&dir);

        let response = get(&handler, "/nope.html").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_shared_headers(&response);
        assert!(body_string(response).await.contains("File not found"));

        // A file addressed as a directory
        let response = get(&handler, "/hello.txt/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_stays_in_root() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        std::fs::create_dir(outer.path().join("public")).unwrap();
        let handler =
            StaticFileHandler::new(outer.path().join("public"), &Config::default());

        for uri in ["/../secret.txt", "/%2e%2e/secret.txt", "/..%2fsecret.txt"] {
            let response = get(&handler, uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let dir = site();
        let response = handler(&dir).handle(&request("OPTIONS", "/anything"), None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_shared_headers(&response);
        assert_eq!(response.headers()[ACCESS_CONTROL_MAX_AGE], "3600");
        assert_eq!(
            response.headers().get_all(ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(),
            2
        );
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let dir = site();
        let response = handler(&dir).handle(&request("POST", "/hello.txt"), None).await;

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_shared_headers(&response);
        assert_eq!(body_string(response).await, "Unsupported method ('POST')");
    }

    #[tokio::test]
    async fn test_only_non_200_responses_logged() {
        let dir = site();
        let handler = handler(&dir);
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        get(&handler, "/hello.txt").await;
        get(&handler, "/files/").await;
        get(&handler, "/missing.txt").await;
        get(&handler, "/both").await;

        let contents = logs.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2, "{contents}");
        assert!(lines[0].contains("\"GET /missing.txt HTTP/1.1\" 404"));
        assert!(lines[1].contains("\"GET /both HTTP/1.1\" 301"));
    }

    struct StubLister;

    #[async_trait]
    impl DirectoryLister for StubLister {
        async fn list(&self, _dir: &Path, url_path: &str) -> Response<ResponseBody> {
            http::build_html_response(format!("stub {url_path}"))
        }
    }

    #[tokio::test]
    async fn test_custom_lister() {
        let dir = site();
        let handler = handler(&dir).with_lister(Arc::new(StubLister));

        let response = get(&handler, "/files/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_shared_headers(&response);
        assert_eq!(body_string(response).await, "stub /files/");
    }

    struct LatinLookup;

    impl MimeLookup for LatinLookup {
        fn guess(&self, _extension: &str) -> Option<MimeGuess> {
            Some(MimeGuess {
                essence: "text/plain",
                charset: Some("latin-1"),
            })
        }
    }

    #[tokio::test]
    async fn test_custom_mime_lookup() {
        let dir = site();
        let handler = handler(&dir).with_mime_lookup(Arc::new(LatinLookup));

        let txt = get(&handler, "/hello.txt").await;
        assert_eq!(txt.headers()[CONTENT_TYPE], "text/plain; charset=latin-1");
        // Fixed suffixes are not delegated
        let js = get(&handler, "/index.js").await;
        assert_eq!(js.headers()[CONTENT_TYPE], "application/javascript");
    }
}

//! HTTP response building module
//!
//! Provides builders for the status responses the handler emits and the
//! streaming file body. None of these add the CORS/security headers; that is
//! left to [`super::finalize_headers`].

use futures_util::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Response, StatusCode};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::headers::append_preflight_headers;

/// Body type for every response
///
/// File bodies can fail mid-stream, which aborts the connection.
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Read size for streamed file bodies
const CHUNK_SIZE: usize = 64 * 1024;

pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream an open file in chunks
///
/// The file handle is owned by the stream and closed when the body is
/// finished, fails, or is dropped with the connection.
pub fn file_body(file: File) -> ResponseBody {
    let chunks = stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let read = file.read(&mut buf).await?;
        let next = if read == 0 {
            None
        } else {
            buf.truncate(read);
            Some((Frame::data(Bytes::from(buf)), file))
        };
        Ok::<_, io::Error>(next)
    });
    StreamBody::new(chunks).boxed_unsync()
}

/// Build 200 preflight response (OPTIONS)
pub fn build_preflight_response() -> Response<ResponseBody> {
    let mut response = Response::new(empty_body());
    append_preflight_headers(response.headers_mut());
    response
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            fallback_response(StatusCode::MOVED_PERMANENTLY)
        })
}

/// Build 404 Not Found response with a plain-text explanation
pub fn build_404_response(message: &str) -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, message.to_string())
}

/// Build 501 Not Implemented response for methods other than GET/HEAD/OPTIONS
pub fn build_501_response(method: &str) -> Response<ResponseBody> {
    build_text_response(
        StatusCode::NOT_IMPLEMENTED,
        format!("Unsupported method ('{method}')"),
    )
}

/// Build generic HTML response
pub fn build_html_response(content: String) -> Response<ResponseBody> {
    let content_length = content.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(full_body(content))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            fallback_response(StatusCode::OK)
        })
}

/// Build 200 response streaming an open file
pub fn build_file_response(
    file: File,
    content_type: &str,
    content_length: u64,
    last_modified: Option<String>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);

    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(file_body(file)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        fallback_response(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

fn build_text_response(status: StatusCode, message: String) -> Response<ResponseBody> {
    let content_length = message.len();

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(full_body(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback_response(status)
        })
}

fn fallback_response(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

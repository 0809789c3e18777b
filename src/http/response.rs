//! HTTP response building module
//!
//! Provides builders for every response shape the server emits,
//! decoupled from specific business logic.

use std::time::SystemTime;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http::date;

/// Build 301 Moved Permanently response (directory without trailing slash)
pub fn build_301_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(301, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(304, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_error_response(403, "Forbidden", "Request forbidden.")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_error_response(404, "Not Found", "Nothing matches the given URI.")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let body = error_page(
        405,
        "Method Not Allowed",
        "Specified method is invalid for this resource.",
    );
    Response::builder()
        .status(405)
        .header("Allow", "GET, HEAD")
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(405, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_error_response(
        500,
        "Internal Server Error",
        "The server failed to read the requested resource.",
    )
}

/// Build 200 response carrying file contents
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    modified: Option<SystemTime>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if let Some(mtime) = modified {
        builder = builder.header("Last-Modified", date::format_http_date(mtime));
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(200, &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 200 HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(200, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build an error response with a minimal HTML body
fn build_error_response(status: u16, reason: &str, explain: &str) -> Response<Full<Bytes>> {
    let body = error_page(status, reason, explain);
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Minimal HTML error page
fn error_page(status: u16, reason: &str, explain: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{status} {reason}</title>\n</head>\n<body>\n\
         <h1>{status} {reason}</h1>\n<p>{explain}</p>\n</body>\n</html>\n"
    )
}

/// Log response build error
fn log_build_error(status: u16, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

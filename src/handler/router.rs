//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, context
//! extraction, static file dispatch, and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderMap, HeaderValue, DATE, SERVER};
use hyper::{Method, Request, Response, Version};

use crate::config::ServerState;
use crate::handler::static_files;
use crate::http::{self, date};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<ServerState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let version = req.version();
    let is_head = method == Method::HEAD;

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);

    let ctx = RequestContext {
        path: &path,
        is_head,
        if_modified_since: header_value(req.headers(), "if-modified-since"),
        access_log,
    };

    let mut response = if matches!(method, Method::GET | Method::HEAD) {
        static_files::serve(&ctx, &state).await
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        http::build_405_response()
    };

    stamp_common_headers(&mut response, &state);

    if access_log {
        let mut entry =
            AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path.clone());
        entry.query = query;
        entry.http_version = version_label(version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_bytes(&response);
        entry.referer = header_value(req.headers(), "referer");
        entry.user_agent = header_value(req.headers(), "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Extract a header as an owned string, skipping non-UTF-8 values
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Stamp the Server and Date headers every response carries
fn stamp_common_headers(response: &mut Response<Full<Bytes>>, state: &ServerState) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(SERVER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&date::format_http_date(SystemTime::now())) {
        headers.insert(DATE, value);
    }
}

/// Exact size of the response body, as recorded in the access log
fn body_bytes(response: &Response<Full<Bytes>>) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

/// HTTP version label for access log lines
fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_09 {
        "0.9"
    } else {
        "1.1"
    }
}

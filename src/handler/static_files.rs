//! Static file serving module
//!
//! Maps request paths onto the served root and builds file, listing,
//! and error responses.

use std::io;
use std::path::{Component, Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::config::ServerState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, date, mime, response};
use crate::logger;

/// Outcome of mapping a request path onto the served root.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// A regular file to serve
    File(PathBuf),
    /// A directory to index or list
    Directory(PathBuf),
    /// A directory requested without its trailing slash
    Redirect(String),
    /// Nothing under the root matches, or the path escapes the root
    NotFound,
}

/// Serve a GET/HEAD request from the served root
pub async fn serve(ctx: &RequestContext<'_>, state: &ServerState) -> Response<Full<Bytes>> {
    match resolve_request_path(&state.root, ctx.path) {
        Resolved::Redirect(location) => http::build_301_response(&location),
        Resolved::NotFound => http::build_404_response(),
        Resolved::File(file_path) => serve_file(ctx, &file_path).await,
        Resolved::Directory(dir_path) => serve_directory(ctx, state, &dir_path).await,
    }
}

/// Map a raw request path onto the served root.
///
/// The path is percent-decoded and re-joined component-wise: `.` and
/// `..` components are discarded, so the joined path cannot climb out
/// of the root on its own. The canonicalized result is still checked
/// against the canonical root, which also refuses symlinks whose
/// target lies outside it.
pub fn resolve_request_path(root: &Path, raw_path: &str) -> Resolved {
    let Ok(decoded) = percent_decode_str(raw_path).decode_utf8() else {
        return Resolved::NotFound;
    };

    let mut joined = root.to_path_buf();
    for component in Path::new(decoded.as_ref()).components() {
        if let Component::Normal(part) = component {
            joined.push(part);
        }
    }

    let Ok(canonical) = joined.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path escapes served root, refused: {} -> {}",
            raw_path,
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    if canonical.is_dir() {
        if decoded.ends_with('/') {
            Resolved::Directory(canonical)
        } else {
            // Relative links in the listing require the slash form
            Resolved::Redirect(format!("{raw_path}/"))
        }
    } else if canonical.is_file() {
        Resolved::File(canonical)
    } else {
        // Sockets, FIFOs and friends are not served
        Resolved::NotFound
    }
}

/// Serve a single regular file
async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(file_path).await {
        Ok(m) => m,
        Err(e) => return io_error_response(file_path, &e),
    };
    let modified = metadata.modified().ok();

    if let (Some(mtime), Some(ims)) = (modified, ctx.if_modified_since.as_deref()) {
        if date::not_modified_since(ims, mtime) {
            return http::build_304_response();
        }
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => return io_error_response(file_path, &e),
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    response::build_file_response(Bytes::from(content), content_type, modified, ctx.is_head)
}

/// Serve a directory: the first index file present, else a listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &ServerState,
    dir_path: &Path,
) -> Response<Full<Bytes>> {
    for index_file in &state.config.files.index_files {
        let candidate = dir_path.join(index_file);
        if candidate.is_file() {
            return serve_file(ctx, &candidate).await;
        }
    }

    if !state.config.files.autoindex {
        return http::build_404_response();
    }

    match listing::collect_entries(dir_path).await {
        Ok(entries) => {
            let html = listing::render(&display_path(ctx.path), &entries);
            response::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to list '{}': {e}", dir_path.display()));
            http::build_500_response()
        }
    }
}

/// Map a filesystem error onto the client-facing status
fn io_error_response(path: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    match err.kind() {
        io::ErrorKind::NotFound => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", path.display()));
            http::build_403_response()
        }
        _ => {
            logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
            http::build_500_response()
        }
    }
}

/// Decoded request path, as shown in listing titles
fn display_path(raw_path: &str) -> String {
    percent_decode_str(raw_path)
        .decode_utf8()
        .map_or_else(|_| raw_path.to_string(), |s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_statuses() {
        let path = Path::new("whatever");
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(io_error_response(path, &not_found).status(), 404);

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "no");
        assert_eq!(io_error_response(path, &denied).status(), 403);

        let other = io::Error::new(io::ErrorKind::UnexpectedEof, "disk");
        assert_eq!(io_error_response(path, &other).status(), 500);
    }

    #[test]
    fn test_display_path_decodes() {
        assert_eq!(display_path("/a%20b/"), "/a b/");
        assert_eq!(display_path("/plain/"), "/plain/");
    }
}

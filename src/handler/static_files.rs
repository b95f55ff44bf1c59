//! Static file serving module
//!
//! Maps request paths onto the document root and produces file, index,
//! listing, redirect and error responses.

use crate::config::AppState;
use crate::handler::listing::{render_listing, ListingEntry};
use crate::handler::router::RequestContext;
use crate::http::{self, date, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Split a raw request target into its path and the `?query` suffix.
///
/// Anything after `#` is dropped.
pub fn split_target(raw: &str) -> (&str, &str) {
    let raw = raw.split('#').next().unwrap_or(raw);
    raw.find('?').map_or((raw, ""), |idx| raw.split_at(idx))
}

/// Resolve a request path (without query) to a filesystem path under `root`.
///
/// The path is percent-decoded, then empty, `.` and `..` segments are
/// discarded, so the result never leaves `root` lexically.
pub fn translate_path(root: &Path, request_path: &str) -> PathBuf {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    let mut resolved = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains(MAIN_SEPARATOR)
        {
            continue;
        }
        resolved.push(segment);
    }
    resolved
}

/// Serve a GET or HEAD request from the document root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let (path, query) = split_target(ctx.raw_path);
    let fs_path = translate_path(&state.root, path);

    let metadata = match fs::metadata(&fs_path).await {
        Ok(m) => m,
        Err(e) => return io_error_response(&e, &fs_path),
    };

    if metadata.is_dir() {
        if !path.ends_with('/') {
            return http::build_redirect_response(&format!("{path}/{query}"));
        }
        for index in &state.config.http.index_files {
            let candidate = fs_path.join(index);
            if let Ok(index_meta) = fs::metadata(&candidate).await {
                if index_meta.is_file() {
                    return serve_file(ctx, &candidate, &index_meta).await;
                }
            }
        }
        return serve_listing(&fs_path, path).await;
    }

    // A file never answers to a directory-style URL
    if path.ends_with('/') {
        return http::build_404_response();
    }

    serve_file(ctx, &fs_path, &metadata).await
}

async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let mut file = match fs::File::open(file_path).await {
        Ok(f) => f,
        Err(e) => return io_error_response(&e, file_path),
    };

    let modified = metadata.modified().ok();
    if let (Some(modified), Some(since)) = (modified, ctx.if_modified_since.as_deref()) {
        if !ctx.has_if_none_match && date::is_not_modified(modified, since) {
            return http::build_304_response();
        }
    }

    let content_type = mime::content_type_for(file_path);
    let last_modified = modified.map(date::format_http_date);
    let size = metadata.len();

    if ctx.is_head {
        return http::build_file_response(Bytes::new(), size, content_type, last_modified.as_deref());
    }

    let mut content = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
    if let Err(e) = file.read_to_end(&mut content).await {
        logger::log_error(&format!(
            "Failed to read file '{}': {e}",
            file_path.display()
        ));
        return http::build_404_response();
    }

    let length = content.len() as u64;
    http::build_file_response(Bytes::from(content), length, content_type, last_modified.as_deref())
}

async fn serve_listing(dir: &Path, request_path: &str) -> Response<Full<Bytes>> {
    let entries = match read_listing_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => return io_error_response(&e, dir),
    };

    let display_path = percent_decode_str(request_path).decode_utf8_lossy();
    http::build_listing_response(render_listing(&display_path, entries))
}

async fn read_listing_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        // Symlinks count as directories when their target is one
        let is_dir = if is_symlink {
            fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    Ok(entries)
}

/// Map a filesystem error (open, read or directory listing) to the response
/// sent for it
fn io_error_response(err: &io::Error, path: &Path) -> Response<Full<Bytes>> {
    match err.kind() {
        // Missing files are routine; no log beyond the access line
        io::ErrorKind::NotFound => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", path.display()));
            http::build_403_response()
        }
        _ => {
            logger::log_warning(&format!("Cannot access '{}': {err}", path.display()));
            http::build_404_response()
        }
    }
}

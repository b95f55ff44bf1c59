//! HTTP response building module
//!
//! Builders for every response the file server produces. Header decoration
//! happens afterwards, in the request handler.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build 200 response for a file.
///
/// `content_length` is the size on disk and may differ from `data` for HEAD
/// requests, where the body is never read.
pub fn build_file_response(
    data: Bytes,
    content_length: u64,
    content_type: &str,
    last_modified: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }

    builder.body(Full::new(data)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 200 response carrying a generated directory listing
pub fn build_listing_response(html: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", html.len())
        .body(Full::new(Bytes::from(html)))
        .unwrap_or_else(|e| {
            log_build_error("listing", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect, used to add the trailing slash to directory URLs
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::FORBIDDEN, "Permission denied")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "File not found")
}

/// Build 501 response for methods other than GET and HEAD
pub fn build_501_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_IMPLEMENTED, "Unsupported method")
}

/// Build a small HTML error page
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let page = error_page(status, message);

    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", page.len())
        .body(Full::new(Bytes::from(page)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = status;
            resp
        })
}

fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Error response</title>\n\
         </head>\n\
         <body>\n\
         <h1>Error response</h1>\n\
         <p>Error code: {code}</p>\n\
         <p>Message: {message}.</p>\n\
         <p>Error code explanation: {code} - {reason}.</p>\n\
         </body>\n\
         </html>\n",
        code = status.as_u16(),
    )
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, response decoration and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Request target as received: path plus query, still percent-encoded
    pub raw_path: &'a str,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &Request<B>, raw_path: &'a str) -> Self {
        Self {
            raw_path,
            is_head: req.method() == Method::HEAD,
            if_modified_since: req
                .headers()
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: req.headers().contains_key(IF_NONE_MATCH),
        }
    }
}

/// Main entry point for HTTP request handling.
///
/// Never fails: every problem is turned into a status code, and the asset and
/// CORS headers are attached whatever that status is.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let raw_path = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), |pq| pq.as_str().to_string());
    let ctx = RequestContext::from_request(&req, &raw_path);

    let mut response = match req.method() {
        &Method::GET | &Method::HEAD => static_files::serve(&ctx, &state).await,
        _ => http::build_501_response(),
    };

    if ctx.is_head {
        *response.body_mut() = Full::new(Bytes::new());
    }

    http::headers::set_server_name(&mut response, &state.config.http.server_name);
    http::decorate(&mut response, &raw_path);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            req.method().to_string(),
            raw_path.clone(),
        );
        entry.protocol = format!("{:?}", req.version());
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        logger::log_access(&entry);
    }

    Ok(response)
}

//! Response header policy
//!
//! Every response leaving the server passes through [`decorate`], whatever its
//! status code.

use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_ENCODING, SERVER};
use hyper::Response;

/// Path marker of assets the build pipeline already gzip-compressed
pub const PRECOMPRESSED_MARKER: &str = "unityweb";

/// Whether the raw request path names a pre-compressed asset.
///
/// Plain case-sensitive substring match on the path as received (query
/// included, nothing decoded). The file contents are never inspected.
///
/// # Examples
/// ```
/// use unityweb_server::http::is_precompressed_asset_path;
/// assert!(is_precompressed_asset_path("/Build/game.unityweb.data"));
/// assert!(!is_precompressed_asset_path("/index.html"));
/// ```
pub fn is_precompressed_asset_path(path: &str) -> bool {
    path.contains(PRECOMPRESSED_MARKER)
}

/// Attach the asset encoding and CORS headers to a finished response
pub fn decorate<B>(response: &mut Response<B>, raw_path: &str) {
    let headers = response.headers_mut();
    if is_precompressed_asset_path(raw_path) {
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    }
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}

/// Set the `Server` header, skipping names that are not valid header values
pub fn set_server_name<B>(response: &mut Response<B>, server_name: &str) {
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(e) => crate::logger::log_warning(&format!(
            "Invalid server name '{server_name}': {e}"
        )),
    }
}

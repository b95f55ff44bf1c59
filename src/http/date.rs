//! HTTP-date handling for `Last-Modified` and `If-Modified-Since`

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate layout, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP-date. Unparseable values yield `None` and are ignored by callers.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Whether a file modified at `modified` is unchanged since `if_modified_since`.
///
/// HTTP dates have one-second resolution, so the sub-second part of the
/// modification time is dropped before comparing.
pub fn is_not_modified(modified: SystemTime, if_modified_since: &str) -> bool {
    parse_http_date(if_modified_since)
        .is_some_and(|since| DateTime::<Utc>::from(modified).timestamp() <= since.timestamp())
}

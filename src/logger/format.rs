//! Access log format module
//!
//! One line per request in Common Log Format (CLF):
//! `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`

use chrono::Local;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request target as received, query included
    pub target: String,
    /// Protocol as sent on the request line, e.g. `HTTP/1.1`
    pub protocol: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, target: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            target,
            protocol: "HTTP/1.1".to_string(),
            status: 200,
            body_bytes: 0,
        }
    }

    /// Render the entry as a Common Log Format line
    pub fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.target,
            self.protocol,
            self.status,
            self.body_bytes,
        )
    }
}

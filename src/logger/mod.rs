//! Logger module
//!
//! Console logging for the server:
//! - Startup and shutdown messages on stdout
//! - One access log line per request on stderr
//! - Errors and warnings on stderr

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;
use std::path::Path;

/// Write info message
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

/// Write to access log
fn write_access(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    write_info(&format!(
        "Serving HTTP on {} port {} (http://{addr}/) ...",
        addr.ip(),
        addr.port()
    ));
    write_info(&format!("Document root: {}", root.display()));
}

pub fn log_shutdown() {
    write_info("\nShutdown signal received, exiting.");
}

pub fn log_access(entry: &AccessLogEntry) {
    write_access(&entry.format_common());
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

//! Static file development server for Unity WebGL builds.
//!
//! Serves the working directory over HTTP, marks every response with
//! `Access-Control-Allow-Origin: *` and advertises `Content-Encoding: gzip`
//! for paths containing `unityweb`, whose files the build already compressed.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

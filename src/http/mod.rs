//! HTTP protocol layer module
//!
//! Response builders, header policy, content types and HTTP dates, kept free of
//! any knowledge about where the bytes come from.

pub mod date;
pub mod headers;
pub mod mime;
pub mod response;

pub use headers::{decorate, is_precompressed_asset_path};
pub use response::{
    build_304_response, build_403_response, build_404_response, build_501_response,
    build_file_response, build_listing_response, build_redirect_response,
};

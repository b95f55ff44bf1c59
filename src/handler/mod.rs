// Request handler module
// Dispatches requests and implements static file semantics

mod listing;
pub mod router;
pub mod static_files;

pub use router::{handle_request, RequestContext};
pub use static_files::translate_path;

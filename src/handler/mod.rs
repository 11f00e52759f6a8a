//! Request handler module
//!
//! Responsible for request routing dispatch: the upload page on `/` and
//! text extraction on `/upload`.

pub mod page;
pub mod router;
pub mod upload;

// Re-export main entry point
pub use router::handle_request;

//! HTTP protocol layer module
//!
//! Provides HTTP response builders shared by the page and upload handlers.

pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_error_response,
    build_health_response, build_html_response, build_json_response, build_options_response,
};

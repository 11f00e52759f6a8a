//! Upload intake module
//!
//! Pulls the `file` part out of a multipart request and streams it into a
//! [`TransientUpload`].

mod multipart;
mod transient;

pub use multipart::receive_file;
pub use transient::TransientUpload;

/// A file received from the client, alive for one request
pub struct UploadedFile {
    /// Client-supplied name, informational only
    pub original_name: Option<String>,
    /// Client-supplied MIME type, not verified
    pub declared_type: String,
    pub size: u64,
    pub storage: TransientUpload,
}

//! Upload error taxonomy
//!
//! Every failure of the upload endpoint ends up as one of these variants.
//! The variant decides the status code and the fixed message the client
//! sees; the underlying cause is only logged.

use hyper::StatusCode;

use crate::extract::ExtractError;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("request carries no file part")]
    MissingFile,
    #[error("unsupported declared type '{0}'")]
    UnsupportedFormat(String),
    #[error("failed to process upload: {0}")]
    ProcessingFailed(#[from] ExtractError),
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(u64),
    #[error("malformed multipart body: {0}")]
    MalformedRequest(String),
    #[error("upload not handled within {0} seconds")]
    TimedOut(u64),
}

impl UploadError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::UnsupportedFormat(_) | Self::MalformedRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ProcessingFailed(_) | Self::TimedOut(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Message placed in the `error` field of the JSON body
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::MissingFile => "No file uploaded",
            Self::UnsupportedFormat(_) => "Unsupported file format, upload PDF or TXT.",
            Self::ProcessingFailed(_) | Self::TimedOut(_) => "Failed to process file.",
            Self::PayloadTooLarge(_) => "File too large.",
            Self::MalformedRequest(_) => "Malformed upload request.",
        }
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        Self::ProcessingFailed(ExtractError::Io(err))
    }
}

impl From<multer::Error> for UploadError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::StreamSizeExceeded { limit } => Self::PayloadTooLarge(limit),
            multer::Error::FieldSizeExceeded { limit, .. } => Self::PayloadTooLarge(limit),
            other => Self::MalformedRequest(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(UploadError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UploadError::UnsupportedFormat("image/png".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UploadError::ProcessingFailed(ExtractError::Pdf("bad xref".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(UploadError::PayloadTooLarge(10).status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(UploadError::TimedOut(60).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(UploadError::TimedOut(60).client_message(), "Failed to process file.");
    }

    #[test]
    fn test_client_message_hides_cause() {
        let err = UploadError::ProcessingFailed(ExtractError::Pdf("invalid cross-reference table".into()));
        assert_eq!(err.client_message(), "Failed to process file.");
        assert!(err.to_string().contains("cross-reference"));
    }

    #[test]
    fn test_io_error_is_processing_failure() {
        let err: UploadError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, UploadError::ProcessingFailed(ExtractError::Io(_))));
    }

    #[test]
    fn test_multer_size_error_maps_to_413() {
        let err: UploadError = multer::Error::StreamSizeExceeded { limit: 1024 }.into();
        assert!(matches!(err, UploadError::PayloadTooLarge(1024)));
    }
}

//! Upload endpoint
//!
//! received → stored → read → cleaned up → classified → extracted → responded.
//! The transient file is released right after its single read, whatever the
//! outcome of that read.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

use crate::config::{AppState, UploadConfig};
use crate::error::UploadError;
use crate::http;
use crate::logger;
use crate::upload::{self, UploadedFile};

/// Successful upload response body
#[derive(Debug, Serialize)]
struct ExtractedText {
    text: String,
}

/// Handle `POST /upload`.
///
/// Receiving and extracting together are bounded by
/// `performance.request_timeout`; running out of time is answered with a
/// JSON error like any other failure.
pub async fn serve_upload<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = Duration::from_secs(state.config.performance.request_timeout);
    let outcome = tokio::time::timeout(limit, extract_upload(req, state))
        .await
        .unwrap_or_else(|_| Err(UploadError::TimedOut(limit.as_secs())));

    match outcome {
        Ok(text) => http::build_json_response(StatusCode::OK, &ExtractedText { text }),
        Err(err) => {
            logger::log_upload_rejected(&err);
            http::build_error_response(err.status(), err.client_message())
        }
    }
}

async fn extract_upload<B>(req: Request<B>, state: &AppState) -> Result<String, UploadError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    check_body_size(&req, &state.config.upload)?;

    let upload = upload::receive_file(req, &state.config.upload).await?;
    logger::log_upload_received(&upload);

    let UploadedFile {
        declared_type,
        storage,
        ..
    } = upload;
    let content = storage.read_all().await;
    drop(storage);
    let content = content?;

    let format = state
        .extractors
        .classify(&declared_type, &content)
        .ok_or(UploadError::UnsupportedFormat(declared_type))?;
    Ok(state.extractors.extract(format, content).await?)
}

/// Reject a declared Content-Length above the limit before reading the body
fn check_body_size<B>(req: &Request<B>, config: &UploadConfig) -> Result<(), UploadError> {
    let Some(content_length) = req.headers().get(CONTENT_LENGTH) else {
        return Ok(());
    };
    match content_length.to_str().ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(size) if size > config.max_request_size() => {
            Err(UploadError::PayloadTooLarge(config.max_file_size))
        }
        Some(_) => Ok(()),
        None => {
            logger::log_warning("Invalid Content-Length value, skipping size check");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatPolicyKind;

    fn upload_config(max_file_size: u64) -> UploadConfig {
        UploadConfig {
            dir: std::env::temp_dir(),
            max_file_size,
            format_policy: FormatPolicyKind::Declared,
        }
    }

    #[test]
    fn test_check_body_size() {
        let config = upload_config(1024);
        let limit = config.max_request_size();

        let small = Request::post("/upload").header(CONTENT_LENGTH, "100").body(()).unwrap();
        assert!(check_body_size(&small, &config).is_ok());

        let framed = Request::post("/upload")
            .header(CONTENT_LENGTH, limit.to_string())
            .body(())
            .unwrap();
        assert!(check_body_size(&framed, &config).is_ok());

        let large = Request::post("/upload")
            .header(CONTENT_LENGTH, (limit + 1).to_string())
            .body(())
            .unwrap();
        assert!(matches!(
            check_body_size(&large, &config),
            Err(UploadError::PayloadTooLarge(1024))
        ));

        let garbage = Request::post("/upload").header(CONTENT_LENGTH, "lots").body(()).unwrap();
        assert!(check_body_size(&garbage, &config).is_ok());

        let absent = Request::post("/upload").body(()).unwrap();
        assert!(check_body_size(&absent, &config).is_ok());
    }
}

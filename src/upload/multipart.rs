use futures::TryStreamExt;
use http_body_util::BodyStream;
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use multer::{Constraints, Multipart, SizeLimit};

use super::{TransientUpload, UploadedFile};
use crate::config::UploadConfig;
use crate::error::UploadError;

/// Name of the form field carrying the document
pub const FILE_FIELD: &str = "file";

/// Type assumed for file parts that declare none (RFC 7578 section 4.4)
const DEFAULT_PART_TYPE: &str = "text/plain";

/// Stream the first `file` part of a multipart request to disk.
///
/// The file content may use all of `max_file_size`; the framing around it
/// is covered by [`UploadConfig::max_request_size`].
///
/// Requests that are not `multipart/form-data`, or that carry no file part
/// under [`FILE_FIELD`], yield [`UploadError::MissingFile`]. A `file` part
/// without a filename is a plain form value and does not count. Parts after
/// the accepted one are never read.
pub async fn receive_file<B>(req: Request<B>, config: &UploadConfig) -> Result<UploadedFile, UploadError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let Some(boundary) = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
    else {
        return Err(UploadError::MissingFile);
    };

    let stream = BodyStream::new(req.into_body())
        .try_filter_map(|frame| async move { Ok(frame.into_data().ok()) });
    let limits = SizeLimit::new()
        .whole_stream(config.max_request_size())
        .for_field(FILE_FIELD, config.max_file_size);
    let constraints = Constraints::new().size_limit(limits);
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let original_name = field.file_name().map(ToString::to_string);
        let declared_type = field
            .content_type()
            .map_or_else(|| DEFAULT_PART_TYPE.to_string(), ToString::to_string);

        let mut storage = TransientUpload::create_in(&config.dir).await?;
        let mut size = 0u64;
        while let Some(chunk) = field.chunk().await? {
            storage.write_chunk(&chunk).await?;
            size += chunk.len() as u64;
        }
        storage.finish().await?;

        return Ok(UploadedFile {
            original_name,
            declared_type,
            size,
            storage,
        });
    }

    Err(UploadError::MissingFile)
}

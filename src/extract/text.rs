use super::{ExtractError, TextExtractor};

/// Decodes the upload as UTF-8, byte for byte.
///
/// Invalid sequences are an error rather than being replaced, and a
/// leading byte-order mark is kept.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, content: &[u8]) -> Result<String, ExtractError> {
        Ok(String::from_utf8(content.to_vec())?)
    }
}

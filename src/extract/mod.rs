//! Text extraction module
//!
//! Classifies an uploaded document and turns it into plain text:
//! - `policy`: decides which format an upload is (declared type or sniffing)
//! - `pdf`: PDF text extraction backed by `pdf-extract`
//! - `text`: UTF-8 plain text
//!
//! The upload handler only talks to [`Extractors`], so the policy and the
//! per-format extractors can be replaced without touching its control flow.

mod pdf;
mod policy;
mod text;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::FormatPolicyKind;

#[cfg(test)]
pub use pdf::sample_pdf;
pub use pdf::PdfExtractor;
pub use policy::{DeclaredTypePolicy, FormatPolicy, SniffingPolicy};
pub use text::PlainTextExtractor;

/// Errors raised while turning document bytes into text
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("extraction task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("no extractor registered for {0:?}")]
    Unregistered(DocumentFormat),
}

/// Document formats the service can extract text from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    pub const PDF_MIME: &'static str = "application/pdf";
    pub const TEXT_MIME: &'static str = "text/plain";

    /// Map a declared MIME type to a format.
    ///
    /// Only the essence is compared (parameters such as `charset` are
    /// ignored) and the comparison is case-insensitive.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(Self::PDF_MIME) {
            Some(Self::Pdf)
        } else if essence.eq_ignore_ascii_case(Self::TEXT_MIME) {
            Some(Self::PlainText)
        } else {
            None
        }
    }
}

/// Turns the raw bytes of one document format into text
pub trait TextExtractor: Send + Sync {
    fn extract(&self, content: &[u8]) -> Result<String, ExtractError>;
}

/// Format policy plus the extractor registered for each format
pub struct Extractors {
    policy: Box<dyn FormatPolicy>,
    by_format: HashMap<DocumentFormat, Arc<dyn TextExtractor>>,
}

impl Extractors {
    /// Empty registry; formats without an extractor classify as unsupported
    pub fn new(policy: Box<dyn FormatPolicy>) -> Self {
        Self {
            policy,
            by_format: HashMap::new(),
        }
    }

    /// Built-in extractors under the configured classification policy
    pub fn with_policy(kind: FormatPolicyKind) -> Self {
        let policy: Box<dyn FormatPolicy> = match kind {
            FormatPolicyKind::Declared => Box::new(DeclaredTypePolicy),
            FormatPolicyKind::Sniff => Box::new(SniffingPolicy),
        };
        Self::new(policy)
            .register(DocumentFormat::Pdf, Arc::new(PdfExtractor))
            .register(DocumentFormat::PlainText, Arc::new(PlainTextExtractor))
    }

    /// Set the extractor used for `format`, replacing any previous one
    #[must_use]
    pub fn register(mut self, format: DocumentFormat, extractor: Arc<dyn TextExtractor>) -> Self {
        self.by_format.insert(format, extractor);
        self
    }

    pub fn classify(&self, declared: &str, content: &[u8]) -> Option<DocumentFormat> {
        self.policy
            .classify(declared, content)
            .filter(|format| self.by_format.contains_key(format))
    }

    /// Extract text on the blocking pool.
    ///
    /// PDF parsing is CPU-bound and the underlying library may panic on
    /// hostile input; a panic surfaces as [`ExtractError::Task`].
    pub async fn extract(&self, format: DocumentFormat, content: Vec<u8>) -> Result<String, ExtractError> {
        let extractor = self
            .by_format
            .get(&format)
            .cloned()
            .ok_or(ExtractError::Unregistered(format))?;
        tokio::task::spawn_blocking(move || extractor.extract(&content)).await?
    }
}

impl Default for Extractors {
    fn default() -> Self {
        Self::with_policy(FormatPolicyKind::Declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panicking;

    impl TextExtractor for Panicking {
        fn extract(&self, _content: &[u8]) -> Result<String, ExtractError> {
            panic!("malformed font table");
        }
    }

    #[test]
    fn test_from_declared() {
        assert_eq!(DocumentFormat::from_declared("application/pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_declared("text/plain"), Some(DocumentFormat::PlainText));
        assert_eq!(
            DocumentFormat::from_declared("Text/Plain; charset=utf-8"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(DocumentFormat::from_declared("application/msword"), None);
        assert_eq!(DocumentFormat::from_declared(""), None);
    }

    #[tokio::test]
    async fn test_extract_plain_text() {
        let extractors = Extractors::default();
        let text = extractors
            .extract(DocumentFormat::PlainText, b"hello world".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn test_panicking_extractor_becomes_error() {
        let extractors = Extractors::default().register(DocumentFormat::Pdf, Arc::new(Panicking));
        let err = extractors
            .extract(DocumentFormat::Pdf, b"%PDF-1.4".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Task(_)));
    }

    #[tokio::test]
    async fn test_registry_only_offers_registered_formats() {
        let extractors = Extractors::new(Box::new(DeclaredTypePolicy))
            .register(DocumentFormat::PlainText, Arc::new(PlainTextExtractor));
        assert_eq!(extractors.classify("application/pdf", b"%PDF-1.4"), None);
        assert_eq!(
            extractors.classify("text/plain", b"notes"),
            Some(DocumentFormat::PlainText)
        );

        let err = extractors
            .extract(DocumentFormat::Pdf, b"%PDF-1.4".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unregistered(DocumentFormat::Pdf)));
    }
}

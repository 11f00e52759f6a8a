//! Format classification policies

use super::DocumentFormat;

/// PDF files must carry their header within the first 1024 bytes
const PDF_HEADER_WINDOW: usize = 1024;
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Decides which format an upload is, or `None` if it is unsupported
pub trait FormatPolicy: Send + Sync {
    fn classify(&self, declared: &str, content: &[u8]) -> Option<DocumentFormat>;
}

/// Trusts the client-declared MIME type and never looks at the content.
///
/// A binary relabelled as `text/plain` is accepted and decoded as text.
pub struct DeclaredTypePolicy;

impl FormatPolicy for DeclaredTypePolicy {
    fn classify(&self, declared: &str, _content: &[u8]) -> Option<DocumentFormat> {
        DocumentFormat::from_declared(declared)
    }
}

/// Requires the content to agree with the declared type
pub struct SniffingPolicy;

impl FormatPolicy for SniffingPolicy {
    fn classify(&self, declared: &str, content: &[u8]) -> Option<DocumentFormat> {
        let format = DocumentFormat::from_declared(declared)?;
        let matches = match format {
            DocumentFormat::Pdf => looks_like_pdf(content),
            DocumentFormat::PlainText => looks_like_text(content),
        };
        matches.then_some(format)
    }
}

fn looks_like_pdf(content: &[u8]) -> bool {
    let window = &content[..content.len().min(PDF_HEADER_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

fn looks_like_text(content: &[u8]) -> bool {
    !content.contains(&0) && std::str::from_utf8(content).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_trusts_client() {
        let exe = b"MZ\x90\x00\x03\x00\x00\x00";
        assert_eq!(
            DeclaredTypePolicy.classify("text/plain", exe),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(DeclaredTypePolicy.classify("image/png", b"hello"), None);
    }

    #[test]
    fn test_sniffing_rejects_relabelled_binary() {
        let exe = b"MZ\x90\x00\x03\x00\x00\x00";
        assert_eq!(SniffingPolicy.classify("text/plain", exe), None);
        assert_eq!(SniffingPolicy.classify("application/pdf", b"hello"), None);
    }

    #[test]
    fn test_sniffing_accepts_matching_content() {
        assert_eq!(
            SniffingPolicy.classify("application/pdf", b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            SniffingPolicy.classify("text/plain", "résumé".as_bytes()),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn test_sniffing_finds_late_pdf_header() {
        let mut content = vec![b' '; 100];
        content.extend_from_slice(b"%PDF-1.4");
        assert_eq!(SniffingPolicy.classify("application/pdf", &content), Some(DocumentFormat::Pdf));

        let mut too_late = vec![b' '; PDF_HEADER_WINDOW];
        too_late.extend_from_slice(b"%PDF-1.4");
        assert_eq!(SniffingPolicy.classify("application/pdf", &too_late), None);
    }
}

use super::{ExtractError, TextExtractor};

/// Extracts the text layer of a PDF with `pdf-extract`.
///
/// Scanned, image-only documents come back as empty or whitespace-only text;
/// that is a successful extraction, not an error.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, content: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(content).map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

/// Build a one-page PDF whose only content is `text` in Courier
#[cfg(test)]
pub fn sample_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_text_layer() {
        let pdf = sample_pdf("Photosynthesis notes");
        let text = PdfExtractor.extract(&pdf).unwrap();
        assert!(text.contains("Photosynthesis"), "unexpected text: {text:?}");
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = PdfExtractor.extract(b"this is not a pdf at all").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}

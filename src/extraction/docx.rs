use std::io::Cursor;

use docx_rust::document::BodyContent;
use docx_rust::DocxFile;

use crate::types::{AppError, AppResult};

/// Extract the body paragraphs of a word-processing document, one per line.
pub fn extract_text(bytes: &[u8]) -> AppResult<String> {
    let file = DocxFile::from_reader(Cursor::new(bytes))
        .map_err(|e| AppError::Extraction(format!("failed to open DOCX: {}", e)))?;
    let docx = file
        .parse()
        .map_err(|e| AppError::Extraction(format!("failed to parse DOCX: {}", e)))?;

    let paragraphs = docx.document.body.content.iter().filter_map(|content| match content {
        BodyContent::Paragraph(paragraph) => Some(paragraph.text()),
        _ => None,
    });

    Ok(join_paragraphs(paragraphs))
}

pub fn join_paragraphs<I>(paragraphs: I) -> String
where
    I: IntoIterator<Item = String>,
{
    paragraphs.into_iter().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rust::document::Paragraph;
    use docx_rust::Docx;

    fn build_docx(paragraphs: &[&'static str]) -> Vec<u8> {
        let mut docx = Docx::default();
        for text in paragraphs {
            docx.document.push(Paragraph::default().push_text(*text));
        }
        docx.write(Cursor::new(Vec::new())).unwrap().into_inner()
    }

    #[test]
    fn test_join_paragraphs() {
        let paragraphs = vec!["First".to_string(), String::new(), "Third".to_string()];
        assert_eq!(join_paragraphs(paragraphs), "First\n\nThird");
    }

    #[test]
    fn test_extract_paragraphs_in_order() {
        let bytes = build_docx(&["NON-DISCLOSURE AGREEMENT", "1. Confidential Information"]);
        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "NON-DISCLOSURE AGREEMENT\n1. Confidential Information");
    }

    #[test]
    fn test_not_a_zip() {
        let err = extract_text(b"plain text pretending to be docx").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}

//! Plain-text extraction
//!
//! Walks the pages of a document strictly in page order and concatenates
//! each page's text layer. No separator is inserted between pages.

use std::path::Path;

use mupdf::Document;

use super::error::PdfError;
use crate::outcome::{Outcome, SkipReason};

/// Extract the text of every page.
///
/// A document whose pages carry no text at all (typically scanned images) is
/// reported as [`SkipReason::NoTextLayer`] rather than as an error. Pages
/// that only yield whitespace count as having no text, so that text is
/// dropped too.
pub fn extract(path: &Path) -> Result<Outcome<String>, PdfError> {
    let path_str = path.to_string_lossy();
    let doc = Document::open(&*path_str)?;
    let page_count = doc.page_count()?;

    let mut text = String::new();
    for index in 0..page_count {
        let page = doc.load_page(index)?;
        text.push_str(&page.to_text()?);
    }

    // Release the MuPDF handle before handing the text on
    drop(doc);

    tracing::debug!(
        path = %path.display(),
        page_count,
        chars = text.chars().count(),
        "Extracted text layer"
    );

    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "PDF has no extractable text layer");
        return Ok(Outcome::Skipped(SkipReason::NoTextLayer));
    }

    Ok(Outcome::Produced(text))
}

/// Same as [`extract`], with the empty case collapsed to `""`
pub fn extract_text(path: &Path) -> Result<String, PdfError> {
    extract(path).map(Outcome::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::write_pdf;
    use tempfile::TempDir;

    #[test]
    fn test_extracts_pages_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        write_pdf(&path, &[Some("Alpha page"), Some("Bravo page"), Some("Charlie page")]);

        let text = extract_text(&path).unwrap();

        let alpha = text.find("Alpha").expect("first page text");
        let bravo = text.find("Bravo").expect("second page text");
        let charlie = text.find("Charlie").expect("third page text");
        assert!(alpha < bravo && bravo < charlie);
    }

    #[test]
    fn test_no_text_layer_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scanned.pdf");
        write_pdf(&path, &[None, None]);

        let outcome = extract(&path).unwrap();
        assert_eq!(outcome.skip_reason(), Some(SkipReason::NoTextLayer));
        assert_eq!(extract_text(&path).unwrap(), "");
    }

    #[test]
    fn test_whitespace_only_pages_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.pdf");
        write_pdf(&path, &[Some("   "), None]);

        let outcome = extract(&path).unwrap();
        assert_eq!(outcome.skip_reason(), Some(SkipReason::NoTextLayer));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = extract(&dir.path().join("missing.pdf"));
        assert!(result.is_err());
    }
}

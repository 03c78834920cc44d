//! PDF handling
//!
//! Two stages of the pipeline live here:
//!
//! - [`reducer`]: shrinks a PDF towards a byte budget by rescaling its pages
//! - [`extractor`]: pulls the plain-text layer out of every page, in order
//!
//! Page rewriting goes through `lopdf`; text extraction goes through MuPDF.

pub mod error;
pub mod extractor;
pub mod reducer;

pub use error::PdfError;
pub use extractor::{extract, extract_text};
pub use reducer::{reduce, CompressionPlan, ReducedPdf};

/// Magic bytes of the PDF header
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers accept the header anywhere in this many leading bytes
pub const HEADER_SEARCH_BYTES: usize = 1024;

/// Check that a byte buffer looks like a PDF before handing it to a parser
pub fn ensure_pdf_bytes(data: &[u8]) -> Result<(), PdfError> {
    let head = &data[..data.len().min(HEADER_SEARCH_BYTES)];
    if head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
        Ok(())
    } else {
        Err(PdfError::NotAPdf("missing %PDF- header".to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic_accepted() {
        assert!(ensure_pdf_bytes(b"%PDF-1.7\n...").is_ok());
    }

    #[test]
    fn test_header_after_leading_bytes_accepted() {
        assert!(ensure_pdf_bytes(b"\n%PDF-1.5\n").is_ok());
        assert!(ensure_pdf_bytes(b"\xEF\xBB\xBF%PDF-1.4").is_ok());

        let mut late = vec![b' '; HEADER_SEARCH_BYTES];
        late.extend_from_slice(b"%PDF-1.4");
        assert!(ensure_pdf_bytes(&late).is_err());
    }

    #[test]
    fn test_non_pdf_rejected() {
        let err = ensure_pdf_bytes(b"PK\x03\x04zip").unwrap_err();
        assert!(err.is_input_error());
        assert!(ensure_pdf_bytes(b"%PD").is_err());
    }
}

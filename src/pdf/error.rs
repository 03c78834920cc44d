//! PDF error types

use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised while reading or rewriting an uploaded PDF
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes do not start with a PDF header
    #[error("Not a PDF file: {0}")]
    NotAPdf(String),

    /// The PDF structure could not be parsed
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("Failed to write PDF: {0}")]
    Write(String),
}

impl PdfError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotAPdf(_) | Self::Load(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Write(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the upload itself is at fault
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::NotAPdf(_) | Self::Load(_))
    }
}

impl From<mupdf::Error> for PdfError {
    fn from(e: mupdf::Error) -> Self {
        PdfError::Load(e.to_string())
    }
}

impl From<lopdf::Error> for PdfError {
    fn from(e: lopdf::Error) -> Self {
        PdfError::Load(e.to_string())
    }
}

//! Error types for the PDF Summarizer server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::pdf::PdfError;
use crate::summarize::SummarizeError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Summarization error: {0}")]
    Summarization(#[from] SummarizeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {}", e))
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Status, machine-readable kind and user-facing message
    pub fn describe(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Pdf(e) if e.is_input_error() => {
                tracing::warn!("Rejected upload: {}", e);
                (
                    e.status_code(),
                    "invalid_pdf",
                    "The uploaded file is not a readable PDF".to_string(),
                )
            }
            AppError::Pdf(e) => {
                tracing::error!("PDF error: {}", e);
                (e.status_code(), "pdf_error", "Failed to process the PDF".to_string())
            }
            AppError::Summarization(e) => {
                tracing::error!("Summarization error: {}", e);
                let kind = match e {
                    SummarizeError::ProviderNotAvailable(_) => "provider_unavailable",
                    SummarizeError::InvalidParameters(_) => "invalid_parameters",
                    _ => "summarization_failed",
                };
                (e.status_code(), kind, "The summary could not be generated".to_string())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "IO error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.describe();

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf_is_bad_request() {
        let err = AppError::from(PdfError::NotAPdf("zip".into()));
        let (status, kind, _) = err.describe();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, "invalid_pdf");
    }

    #[test]
    fn test_provider_failure_is_bad_gateway() {
        let err = AppError::from(SummarizeError::ApiError("boom".into()));
        let (status, kind, _) = err.describe();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(kind, "summarization_failed");
    }

    #[test]
    fn test_write_failure_is_internal() {
        let err = AppError::from(PdfError::Write("disk full".into()));
        assert_eq!(err.describe().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = AppError::PayloadTooLarge("upload exceeds limit".into());
        let (status, kind, _) = err.describe();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(kind, "payload_too_large");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::BadRequest("no file".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

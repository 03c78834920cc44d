//! Summarization Types

use serde::{Deserialize, Serialize};

/// Summarization backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryProvider {
    /// Hugging Face Inference API (hosted seq2seq models such as BART)
    HuggingFace,
    /// Ollama (local LLM)
    Ollama,
}

impl Default for SummaryProvider {
    fn default() -> Self {
        Self::HuggingFace
    }
}

impl SummaryProvider {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Some(Self::HuggingFace),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

/// Summary of one chunk, in the chunk's position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryFragment {
    /// Position of the source chunk
    pub index: usize,
    /// Length of the source chunk in characters
    pub source_chars: usize,
    /// Max length requested from the provider for this chunk
    pub max_length: usize,
    pub text: String,
}

/// Full summary of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub fragments: Vec<SummaryFragment>,
    /// Fragments joined in order, without separators
    pub text: String,
}

impl Summary {
    pub fn from_fragments(fragments: Vec<SummaryFragment>) -> Self {
        let text = fragments.iter().map(|f| f.text.as_str()).collect();
        Self { fragments, text }
    }

    pub fn chunk_count(&self) -> usize {
        self.fragments.len()
    }
}

/// Summarization error types
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Summarization provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Invalid summarization parameters: {0}")]
    InvalidParameters(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl SummarizeError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::ProviderNotAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            Self::ApiError(_) | Self::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

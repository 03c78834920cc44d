//! Summarization Module
//!
//! Produces an abstractive summary of arbitrarily long text with a model that
//! only accepts bounded input.
//!
//! Supports multiple backends:
//! - Hugging Face Inference API (hosted seq2seq models, BART by default)
//! - Ollama (local LLM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pdf_summarizer::summarize::{provider, SummaryService, SummaryServiceConfig};
//!
//! let provider = provider::from_config(&config.summarizer);
//! let service = SummaryService::new(SummaryServiceConfig::default(), provider);
//!
//! let outcome = service.summarize(&text).await?;
//! ```

pub mod chunker;
pub mod provider;
mod service;
mod types;

pub use chunker::{adjusted_max_length, partition, Chunk};
pub use provider::{HuggingFaceProvider, OllamaProvider, SummaryProviderTrait};
pub use service::{SummaryService, SummaryServiceConfig};
pub use types::{SummarizeError, Summary, SummaryFragment, SummaryProvider};

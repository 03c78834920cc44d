//! Chunked Summary Service
//!
//! Splits text into positional chunks, asks the provider for one summary per
//! chunk and stitches the summaries back together in chunk order.

use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};

use super::chunker::{adjusted_max_length, partition, Chunk};
use super::provider::SummaryProviderTrait;
use super::types::{SummarizeError, Summary, SummaryFragment, SummaryProvider};
use crate::outcome::{Outcome, SkipReason};

/// Summary service configuration
#[derive(Debug, Clone)]
pub struct SummaryServiceConfig {
    /// Characters per chunk
    pub chunk_size: usize,
    /// Upper bound on the summary length requested per chunk
    pub max_length: usize,
    /// Lower bound on the summary length requested per chunk
    pub min_length: usize,
    /// Chunk summaries in flight at once (1 = strictly serial)
    pub concurrency: usize,
}

impl Default for SummaryServiceConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            max_length: 200,
            min_length: 30,
            concurrency: 1,
        }
    }
}

/// Summarizes documents of any length with a fixed-context provider
pub struct SummaryService {
    config: SummaryServiceConfig,
    provider: Arc<dyn SummaryProviderTrait>,
}

impl SummaryService {
    /// Create a new summary service around an already constructed provider
    pub fn new(config: SummaryServiceConfig, provider: Arc<dyn SummaryProviderTrait>) -> Self {
        Self { config, provider }
    }

    pub fn provider_type(&self) -> SummaryProvider {
        self.provider.provider_type()
    }

    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Summarize with the configured chunk size and length bounds
    pub async fn summarize(&self, text: &str) -> Result<Outcome<Summary>, SummarizeError> {
        self.summarize_with(
            text,
            self.config.chunk_size,
            self.config.max_length,
            self.config.min_length,
        )
        .await
    }

    /// Summarize `text` chunk by chunk.
    ///
    /// Empty text is skipped without calling the provider. The first chunk
    /// that fails aborts the whole summary.
    pub async fn summarize_with(
        &self,
        text: &str,
        chunk_size: usize,
        max_length: usize,
        min_length: usize,
    ) -> Result<Outcome<Summary>, SummarizeError> {
        if chunk_size == 0 {
            return Err(SummarizeError::InvalidParameters(
                "chunk_size must be greater than zero".to_string(),
            ));
        }

        if text.is_empty() {
            tracing::debug!("No text to summarize");
            return Ok(Outcome::Skipped(SkipReason::EmptyInput));
        }

        let chunks = partition(text, chunk_size);
        tracing::info!(
            chunk_count = chunks.len(),
            chunk_size,
            concurrency = self.config.concurrency,
            provider = ?self.provider.provider_type(),
            "Summarizing text"
        );

        let pending: Vec<_> = chunks
            .into_iter()
            .map(|chunk| self.summarize_chunk(chunk, max_length, min_length))
            .collect();

        // `buffered` yields results in input order whatever order they finish in
        let fragments: Vec<SummaryFragment> = stream::iter(pending)
            .buffered(self.config.concurrency.max(1))
            .try_collect()
            .await?;

        Ok(Outcome::Produced(Summary::from_fragments(fragments)))
    }

    async fn summarize_chunk(
        &self,
        chunk: Chunk<'_>,
        max_length: usize,
        min_length: usize,
    ) -> Result<SummaryFragment, SummarizeError> {
        let adjusted = adjusted_max_length(chunk.chars, max_length);

        tracing::debug!(
            chunk = chunk.index,
            chunk_chars = chunk.chars,
            max_length = adjusted,
            "Summarizing chunk"
        );

        let text = self
            .provider
            .summarize(chunk.text, adjusted, min_length)
            .await
            .map_err(|e| {
                tracing::warn!(chunk = chunk.index, "Chunk summarization failed: {}", e);
                e
            })?;

        Ok(SummaryFragment {
            index: chunk.index,
            source_chars: chunk.chars,
            max_length: adjusted,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::provider::MockProvider;

    fn service_with(provider: Arc<MockProvider>, concurrency: usize) -> SummaryService {
        let config = SummaryServiceConfig {
            concurrency,
            ..Default::default()
        };
        SummaryService::new(config, provider)
    }

    #[tokio::test]
    async fn test_empty_text_skips_provider() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone(), 1);

        let outcome = service.summarize("").await.unwrap();

        assert_eq!(outcome.skip_reason(), Some(SkipReason::EmptyInput));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_two_chunks_concatenated_in_order() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone(), 1);
        let text = format!("{}{}", "a".repeat(2000), "b".repeat(500));

        let outcome = service.summarize(&text).await.unwrap();
        let summary = outcome.produced().unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("a".repeat(2000), 200, 30));
        assert_eq!(calls[1], ("b".repeat(500), 200, 30));

        assert_eq!(summary.chunk_count(), 2);
        assert_eq!(
            summary.text,
            format!("[{}][{}]", "a".repeat(2000), "b".repeat(500))
        );
    }

    #[tokio::test]
    async fn test_single_chunk_is_verbatim() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider, 1);

        let outcome = service.summarize("one short document").await.unwrap();
        let summary = outcome.produced().unwrap();

        assert_eq!(summary.chunk_count(), 1);
        assert_eq!(summary.text, summary.fragments[0].text);
        assert_eq!(summary.text, "[one short document]");
    }

    #[tokio::test]
    async fn test_short_chunk_gets_floor_max_length() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone(), 1);

        service
            .summarize_with(&"z".repeat(2120), 2000, 200, 30)
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls[0].1, 200);
        // 120 - 50 = 70, raised to the floor
        assert_eq!(calls[1].1, 100);
    }

    #[tokio::test]
    async fn test_failure_aborts_whole_summary() {
        let mut provider = MockProvider::new();
        provider.fail_on = Some("bbb".to_string());
        let provider = Arc::new(provider);
        let service = service_with(provider.clone(), 1);

        let result = service.summarize_with("aaabbbccc", 3, 200, 30).await;

        assert!(matches!(result, Err(SummarizeError::ApiError(_))));
        // Serial mode stops at the failing chunk
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_results_keep_chunk_order() {
        let mut provider = MockProvider::new();
        // Earlier chunks finish last
        provider.delays_ms = vec![60, 30, 0];
        let provider = Arc::new(provider);
        let service = service_with(provider.clone(), 3);

        let outcome = service.summarize_with("aaabbbccc", 3, 200, 30).await.unwrap();
        let summary = outcome.produced().unwrap();

        assert_eq!(summary.text, "[aaa][bbb][ccc]");
        let indices: Vec<usize> = summary.fragments.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_zero_chunk_size_rejected() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone(), 1);

        let result = service.summarize_with("text", 0, 200, 30).await;

        assert!(matches!(result, Err(SummarizeError::InvalidParameters(_))));
        assert!(provider.calls().is_empty());
    }
}

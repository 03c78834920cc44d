//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::SummaryPipeline;
use crate::summarize::{provider, SummaryProviderTrait, SummaryService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: SummaryPipeline,
}

impl AppState {
    /// Create state around the configured summarization provider
    pub fn new(config: Config) -> Self {
        let provider = provider::from_config(&config.summarizer);
        Self::with_provider(config, provider)
    }

    /// Create state around an already constructed provider.
    ///
    /// The provider is built once per process and shared by every request.
    pub fn with_provider(config: Config, provider: Arc<dyn SummaryProviderTrait>) -> Self {
        let service = SummaryService::new(config.pipeline.summary_service_config(), provider);
        let pipeline = SummaryPipeline::new(config.pipeline.clone(), Arc::new(service));

        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the summary pipeline
    pub fn pipeline(&self) -> &SummaryPipeline {
        &self.inner.pipeline
    }
}

//! Summarization Providers
//!
//! Defines the provider trait and implementations for different model backends.
//! A provider turns `(text, max_length, min_length)` into one shorter text.
//! Model output is returned untouched; fragments are joined as they come.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{SummarizeError, SummaryProvider};
use crate::config::SummarizerConfig;

/// Summarization provider trait
#[async_trait]
pub trait SummaryProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> SummaryProvider;

    /// Check if the provider is reachable
    async fn is_available(&self) -> bool;

    /// Summarize one piece of text
    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, SummarizeError>;
}

/// Build the configured provider. Called once at startup.
pub fn from_config(config: &SummarizerConfig) -> Arc<dyn SummaryProviderTrait> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider {
        SummaryProvider::HuggingFace => Arc::new(HuggingFaceProvider::new(
            &config.base_url,
            &config.model,
            config.api_token.as_deref(),
            timeout,
        )),
        SummaryProvider::Ollama => Arc::new(OllamaProvider::new(
            &config.base_url,
            &config.model,
            timeout,
        )),
    }
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}, using defaults", e);
            reqwest::Client::new()
        })
}

/// Hugging Face Inference API provider
///
/// Talks to the `summarization` task endpoint, which answers with
/// `[{"summary_text": "..."}]`.
pub struct HuggingFaceProvider {
    /// API base URL
    base_url: String,
    /// Model name (e.g., "facebook/bart-large-cnn")
    model: String,
    /// Bearer token, if the endpoint needs one
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(base_url: &str, model: &str, api_token: Option<&str>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_token: api_token.map(|t| t.to_string()),
            client: http_client(timeout),
        }
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Pull `summary_text` out of a summarization-task response
pub fn parse_huggingface_response(value: &Value) -> Result<String, SummarizeError> {
    let first = match value {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(value),
        _ => None,
    };

    first
        .and_then(|item| item.get("summary_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            SummarizeError::MalformedResponse(format!("missing summary_text in {}", value))
        })
}

#[async_trait]
impl SummaryProviderTrait for HuggingFaceProvider {
    fn provider_type(&self) -> SummaryProvider {
        SummaryProvider::HuggingFace
    }

    async fn is_available(&self) -> bool {
        match self.authorize(self.client.get(self.model_url())).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, SummarizeError> {
        let request = serde_json::json!({
            "inputs": text,
            "parameters": {
                "max_length": max_length,
                "min_length": min_length,
                "do_sample": false
            },
            "options": {
                "wait_for_model": true
            }
        });

        let response = self
            .authorize(self.client.post(self.model_url()))
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizeError::ApiError(format!("Failed to call Hugging Face: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::ApiError(format!(
                "Hugging Face returned {}: {}",
                status, body
            )));
        }

        let result: Value = response
            .json()
            .await
            .map_err(|e| SummarizeError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        parse_huggingface_response(&result)
    }
}

/// Ollama provider
pub struct OllamaProvider {
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llama3.2", "mistral")
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: http_client(timeout),
        }
    }
}

/// Prompt asking an instruction model for a bounded-length summary
pub fn summary_prompt(text: &str, max_length: usize, min_length: usize) -> String {
    format!(
        "Summarize the following text in between {} and {} tokens. \
         Return only the summary, nothing else.\n\n{}",
        min_length, max_length, text
    )
}

pub fn parse_ollama_response(value: &Value) -> Result<String, SummarizeError> {
    value
        .get("response")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SummarizeError::MalformedResponse(format!("missing response in {}", value)))
}

#[async_trait]
impl SummaryProviderTrait for OllamaProvider {
    fn provider_type(&self) -> SummaryProvider {
        SummaryProvider::Ollama
    }

    async fn is_available(&self) -> bool {
        // Check if Ollama is running
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, SummarizeError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = serde_json::json!({
            "model": self.model,
            "prompt": summary_prompt(text, max_length, min_length),
            "stream": false,
            "options": {
                "num_predict": max_length
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizeError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: Value = response
            .json()
            .await
            .map_err(|e| SummarizeError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        parse_ollama_response(&result)
    }
}

/// Mock provider for testing
///
/// Answers with `"[<chunk>]"` and records every call it receives.
#[cfg(test)]
pub struct MockProvider {
    pub available: bool,
    /// Fail any call whose text contains this
    pub fail_on: Option<String>,
    /// Sleep before answering the n-th call, in milliseconds
    pub delays_ms: Vec<u64>,
    /// (text, max_length, min_length) per call
    pub calls: std::sync::Mutex<Vec<(String, usize, usize)>>,
}

#[cfg(test)]
impl MockProvider {
    pub fn new() -> Self {
        Self {
            available: true,
            fail_on: None,
            delays_ms: Vec::new(),
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, usize, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SummaryProviderTrait for MockProvider {
    fn provider_type(&self) -> SummaryProvider {
        SummaryProvider::HuggingFace
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, SummarizeError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), max_length, min_length));
            calls.len() - 1
        };

        if let Some(delay) = self.delays_ms.get(call) {
            tokio::time::sleep(Duration::from_millis(*delay)).await;
        }

        if matches!(&self.fail_on, Some(needle) if text.contains(needle.as_str())) {
            return Err(SummarizeError::ApiError("mock failure".to_string()));
        }

        Ok(format!("[{}]", text))
    }
}

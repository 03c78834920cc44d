//! Configuration management for the PDF Summarizer

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::summarize::chunker::MIN_ADJUSTED_MAX_LENGTH;
use crate::summarize::{SummaryProvider, SummaryServiceConfig};

const MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Byte budget the size reducer aims for
    pub target_size_bytes: u64,
    /// Characters per summarization chunk
    pub chunk_size: usize,
    pub max_length: usize,
    pub min_length: usize,
    /// Chunk summaries in flight per request
    pub summary_concurrency: usize,
    /// Pipelines allowed to run at the same time
    pub max_concurrent_requests: usize,
    pub max_upload_bytes: usize,
    /// Parent directory for per-request scratch space (system temp if unset)
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub provider: SummaryProvider,
    pub base_url: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            pipeline: PipelineConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            target_size_bytes: 5 * MB,
            chunk_size: 2000,
            max_length: 200,
            min_length: 30,
            summary_concurrency: 1,
            max_concurrent_requests: 1,
            max_upload_bytes: 100 * MB as usize,
            work_dir: None,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        SummarizerConfig {
            provider: SummaryProvider::HuggingFace,
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "facebook/bart-large-cnn".to_string(),
            api_token: None,
            timeout_secs: 120,
        }
    }
}

impl SummarizerConfig {
    fn defaults_for(provider: SummaryProvider) -> Self {
        match provider {
            SummaryProvider::HuggingFace => Self::default(),
            SummaryProvider::Ollama => SummarizerConfig {
                provider,
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
                api_token: None,
                timeout_secs: 120,
            },
        }
    }
}

impl PipelineConfig {
    pub fn summary_service_config(&self) -> SummaryServiceConfig {
        SummaryServiceConfig {
            chunk_size: self.chunk_size,
            max_length: self.max_length,
            min_length: self.min_length,
            concurrency: self.summary_concurrency,
        }
    }
}

/// Read and parse an optional environment variable
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

/// Convert a megabyte setting to bytes, rejecting values that overflow
fn megabytes(name: &'static str, mb: u64) -> Result<u64, ConfigError> {
    mb.checked_mul(MB).ok_or_else(|| ConfigError::InvalidValue {
        name,
        value: mb.to_string(),
    })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = PipelineConfig::default();

        let provider = match env::var("SUMMARIZER_PROVIDER") {
            Ok(name) => SummaryProvider::from_name(&name).ok_or(ConfigError::InvalidValue {
                name: "SUMMARIZER_PROVIDER",
                value: name,
            })?,
            Err(_) => SummaryProvider::default(),
        };
        let summarizer_defaults = SummarizerConfig::defaults_for(provider);

        let upload_mb = parse_var("MAX_UPLOAD_MB", 100u64)?;
        let max_upload_bytes = usize::try_from(megabytes("MAX_UPLOAD_MB", upload_mb)?)
            .map_err(|_| ConfigError::InvalidValue {
                name: "MAX_UPLOAD_MB",
                value: upload_mb.to_string(),
            })?;

        let config = Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 3000)?,
            },
            pipeline: PipelineConfig {
                target_size_bytes: megabytes("TARGET_SIZE_MB", parse_var("TARGET_SIZE_MB", 5u64)?)?,
                chunk_size: parse_var("CHUNK_SIZE", defaults.chunk_size)?,
                max_length: parse_var("SUMMARY_MAX_LENGTH", defaults.max_length)?,
                min_length: parse_var("SUMMARY_MIN_LENGTH", defaults.min_length)?,
                summary_concurrency: parse_var("SUMMARY_CONCURRENCY", defaults.summary_concurrency)?,
                max_concurrent_requests: parse_var(
                    "MAX_CONCURRENT_REQUESTS",
                    defaults.max_concurrent_requests,
                )?,
                max_upload_bytes,
                work_dir: env::var("WORK_DIR").ok().map(PathBuf::from),
            },
            summarizer: SummarizerConfig {
                provider,
                base_url: env::var("SUMMARIZER_URL").unwrap_or(summarizer_defaults.base_url),
                model: env::var("SUMMARIZER_MODEL").unwrap_or(summarizer_defaults.model),
                api_token: env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty()),
                timeout_secs: parse_var("SUMMARIZER_TIMEOUT_SECS", summarizer_defaults.timeout_secs)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pipeline;
        if p.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk size must be greater than zero".into()));
        }
        if p.max_length < MIN_ADJUSTED_MAX_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "summary max length must be at least {}",
                MIN_ADJUSTED_MAX_LENGTH
            )));
        }
        if p.min_length > p.max_length {
            return Err(ConfigError::Invalid(
                "summary min length exceeds max length".into(),
            ));
        }
        if p.summary_concurrency == 0 || p.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid("concurrency limits must be at least 1".into()));
        }
        if p.target_size_bytes == 0 {
            return Err(ConfigError::Invalid("target size must be greater than zero".into()));
        }
        Ok(())
    }
}

//! Upload-to-summary pipeline
//!
//! ```text
//!   uploaded bytes
//!       │
//!       ▼
//!   RequestWorkspace   → scratch dir holding the upload (and any rewrite)
//!       │
//!       ▼
//!   reduce()           → rescale pages if the file is over budget
//!       │
//!       ▼
//!   extract()          → text layer of every page, in order
//!       │
//!       ▼
//!   SummaryService     → chunk, summarize, reassemble
//! ```
//!
//! Each run owns its scratch directory; dropping the workspace removes both
//! the uploaded file and the reduced copy.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tempfile::TempDir;
use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{AppError, Result};
use crate::outcome::Outcome;
use crate::pdf::{self, ReducedPdf};
use crate::summarize::{Summary, SummaryService};

const UPLOAD_FILE_NAME: &str = "upload.pdf";

/// Scratch directory for a single request
pub struct RequestWorkspace {
    dir: TempDir,
    input_path: PathBuf,
}

impl RequestWorkspace {
    /// Create the directory under `root` (system temp if `None`) and write
    /// the uploaded bytes into it
    pub fn create(root: Option<&Path>, data: &[u8]) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pdf-summarizer-");

        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        let input_path = dir.path().join(UPLOAD_FILE_NAME);
        fs::write(&input_path, data)?;

        Ok(Self { dir, input_path })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Remove the directory and everything in it
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

/// Everything a caller needs to display one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub request_id: Uuid,
    pub file_name: String,
    pub input_bytes: u64,
    pub compression: Outcome<ReducedPdf>,
    /// Characters in the extracted text layer
    pub text_chars: usize,
    pub summary: Outcome<Summary>,
    pub generated_at: DateTime<Utc>,
}

impl PipelineReport {
    pub fn chunk_count(&self) -> usize {
        self.summary.produced().map(Summary::chunk_count).unwrap_or(0)
    }

    pub fn summary_text(&self) -> &str {
        self.summary.produced().map(|s| s.text.as_str()).unwrap_or("")
    }

    /// Heading shown above the summary
    pub fn heading(&self) -> &'static str {
        match self.chunk_count() {
            0 => "No Text Found",
            1 => "Summary",
            _ => "Concatenated Summary",
        }
    }
}

/// Runs uploads through reduce → extract → summarize
pub struct SummaryPipeline {
    config: PipelineConfig,
    summarizer: Arc<SummaryService>,
    /// Admits `max_concurrent_requests` runs at a time
    gate: Semaphore,
}

impl SummaryPipeline {
    pub fn new(config: PipelineConfig, summarizer: Arc<SummaryService>) -> Self {
        let gate = Semaphore::new(config.max_concurrent_requests.max(1));
        Self {
            config,
            summarizer,
            gate,
        }
    }

    pub fn summarizer(&self) -> &SummaryService {
        &self.summarizer
    }

    /// Process one uploaded PDF from start to finish
    pub async fn run(&self, file_name: &str, data: Vec<u8>) -> Result<PipelineReport> {
        pdf::ensure_pdf_bytes(&data)?;

        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| AppError::Internal("pipeline is shutting down".to_string()))?;

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", %request_id, file_name = %file_name);

        self.run_inner(request_id, file_name, data)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        request_id: Uuid,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<PipelineReport> {
        let input_bytes = data.len() as u64;
        let work_dir = self.config.work_dir.clone();
        let target_bytes = self.config.target_size_bytes;

        tracing::info!(input_bytes, target_bytes, "Processing upload");

        // MuPDF and lopdf are blocking; keep them off the async workers
        let (workspace, compression, text) = tokio::task::spawn_blocking(move || {
            let workspace = RequestWorkspace::create(work_dir.as_deref(), &data)?;
            let compression = pdf::reduce(workspace.input_path(), target_bytes)?;
            let text = pdf::extract(compression.effective_path(workspace.input_path()))?;
            Ok::<_, AppError>((workspace, compression, text))
        })
        .await??;

        let text_chars = text.produced().map(|t| t.chars().count()).unwrap_or(0);

        let summary = match text {
            Outcome::Produced(text) => self.summarizer.summarize(&text).await,
            Outcome::Skipped(reason) => Ok(Outcome::Skipped(reason)),
        };

        if let Err(e) = workspace.close() {
            tracing::warn!("Failed to remove request workspace: {}", e);
        }

        let summary = summary?;

        tracing::info!(
            text_chars,
            chunk_count = summary.produced().map(Summary::chunk_count).unwrap_or(0),
            "Pipeline complete"
        );

        Ok(PipelineReport {
            request_id,
            file_name: file_name.to_string(),
            input_bytes,
            compression,
            text_chars,
            summary,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::SkipReason;
    use crate::pdf::fixtures::build_pdf;
    use crate::pdf::PdfError;
    use crate::summarize::provider::MockProvider;
    use crate::summarize::{SummarizeError, SummaryServiceConfig};

    fn pdf_bytes(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = build_pdf(pages);
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn pipeline(work_dir: &Path, target_size_bytes: u64, provider: Arc<MockProvider>) -> SummaryPipeline {
        let config = PipelineConfig {
            target_size_bytes,
            work_dir: Some(work_dir.to_path_buf()),
            ..Default::default()
        };
        let service = SummaryService::new(SummaryServiceConfig::default(), provider);
        SummaryPipeline::new(config, Arc::new(service))
    }

    fn is_empty_dir(path: &Path) -> bool {
        fs::read_dir(path).unwrap().next().is_none()
    }

    #[test]
    fn test_workspace_removes_files_on_drop() {
        let root = TempDir::new().unwrap();
        let workspace = RequestWorkspace::create(Some(root.path()), b"%PDF-1.4").unwrap();
        let reduced = workspace.path().join("upload.reduced.pdf");
        fs::write(&reduced, b"%PDF-1.6").unwrap();
        assert!(workspace.input_path().exists());

        drop(workspace);

        assert!(is_empty_dir(root.path()));
    }

    #[tokio::test]
    async fn test_small_pdf_is_summarized_without_reduction() {
        let root = TempDir::new().unwrap();
        let provider = Arc::new(MockProvider::new());
        let pipeline = pipeline(root.path(), 5 * 1024 * 1024, provider.clone());

        let report = pipeline
            .run("notes.pdf", pdf_bytes(&[Some("Quarterly results were strong")]))
            .await
            .unwrap();

        assert!(matches!(
            report.compression.skip_reason(),
            Some(SkipReason::WithinBudget { .. })
        ));
        assert_eq!(report.chunk_count(), 1);
        assert_eq!(report.heading(), "Summary");
        assert!(report.summary_text().contains("Quarterly results were strong"));
        assert_eq!(provider.calls().len(), 1);
        assert!(is_empty_dir(root.path()));
    }

    #[tokio::test]
    async fn test_header_after_leading_newline_is_summarized() {
        let root = TempDir::new().unwrap();
        let provider = Arc::new(MockProvider::new());
        let pipeline = pipeline(root.path(), 5 * 1024 * 1024, provider.clone());

        let mut data = b"\n".to_vec();
        data.extend(pdf_bytes(&[Some("Prefixed upload")]));
        let report = pipeline.run("mailed.pdf", data).await.unwrap();

        assert_eq!(report.chunk_count(), 1);
        assert!(report.summary_text().contains("Prefixed upload"));
        assert_eq!(provider.calls().len(), 1);
        assert!(is_empty_dir(root.path()));
    }

    #[tokio::test]
    async fn test_oversized_pdf_is_rescaled_then_summarized() {
        let root = TempDir::new().unwrap();
        let provider = Arc::new(MockProvider::new());
        let data = pdf_bytes(&[Some("First page"), Some("Second page")]);
        let target = data.len() as u64 / 2;
        let pipeline = pipeline(root.path(), target, provider);

        let report = pipeline.run("big.pdf", data).await.unwrap();

        let reduced = report.compression.produced().expect("reduction should run");
        assert_eq!(reduced.page_count, 2);
        assert!(reduced.scale > 1.0);
        assert!(report.summary_text().contains("First page"));
        assert!(is_empty_dir(root.path()), "both temporary files are removed");
    }

    #[tokio::test]
    async fn test_pdf_without_text_skips_summarizer() {
        let root = TempDir::new().unwrap();
        let provider = Arc::new(MockProvider::new());
        let pipeline = pipeline(root.path(), 5 * 1024 * 1024, provider.clone());

        let report = pipeline.run("scan.pdf", pdf_bytes(&[None])).await.unwrap();

        assert_eq!(report.summary.skip_reason(), Some(SkipReason::NoTextLayer));
        assert_eq!(report.heading(), "No Text Found");
        assert_eq!(report.summary_text(), "");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_pdf_upload_rejected() {
        let root = TempDir::new().unwrap();
        let provider = Arc::new(MockProvider::new());
        let pipeline = pipeline(root.path(), 5 * 1024 * 1024, provider.clone());

        let result = pipeline.run("photo.png", b"\x89PNG\r\n".to_vec()).await;

        assert!(matches!(result, Err(AppError::Pdf(PdfError::NotAPdf(_)))));
        assert!(provider.calls().is_empty());
        assert!(is_empty_dir(root.path()));
    }

    #[tokio::test]
    async fn test_provider_failure_aborts_and_cleans_up() {
        let root = TempDir::new().unwrap();
        let mut provider = MockProvider::new();
        provider.fail_on = Some("Some text".to_string());
        let provider = Arc::new(provider);
        let pipeline = pipeline(root.path(), 5 * 1024 * 1024, provider.clone());

        let result = pipeline
            .run("doc.pdf", pdf_bytes(&[Some("Some text")]))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Summarization(SummarizeError::ApiError(_)))
        ));
        assert_eq!(provider.calls().len(), 1);
        assert!(is_empty_dir(root.path()));
    }
}

//! PDF size reducer
//!
//! Rescales every page of a document by one uniform zoom factor derived from
//! how far the file is over its byte budget:
//!
//! ```text
//! ratio = target_bytes / current_bytes
//! scale = 1 / ratio
//! ```
//!
//! The zoom is written as each page's `/UserUnit`. Page geometry is rarely
//! what makes a PDF large (embedded images and fonts are), so the output is
//! not guaranteed to land under the budget. It is written once and never
//! measured against the target again.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object};
use serde::Serialize;

use super::error::PdfError;
use crate::outcome::{Outcome, SkipReason};

/// Lowest PDF version that understands `/UserUnit`
const USER_UNIT_MIN_VERSION: &str = "1.6";

/// Scaling decision for a file that is over budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionPlan {
    pub input_bytes: u64,
    pub target_bytes: u64,
    /// target / current, always in (0, 1)
    pub ratio: f64,
    /// Zoom applied to every page (1 / ratio)
    pub scale: f64,
}

impl CompressionPlan {
    /// Returns `None` when the file already fits the budget
    pub fn for_sizes(input_bytes: u64, target_bytes: u64) -> Option<Self> {
        if input_bytes <= target_bytes {
            return None;
        }

        let ratio = target_bytes as f64 / input_bytes as f64;
        Some(Self {
            input_bytes,
            target_bytes,
            ratio,
            scale: 1.0 / ratio,
        })
    }
}

/// A rescaled copy of the input document
#[derive(Debug, Clone, Serialize)]
pub struct ReducedPdf {
    /// Lives in the request's scratch directory, so it is not reported
    #[serde(skip_serializing)]
    pub path: PathBuf,
    pub ratio: f64,
    pub scale: f64,
    pub page_count: usize,
    pub input_bytes: u64,
    /// Size actually written; may still exceed the target
    pub output_bytes: u64,
}

impl Outcome<ReducedPdf> {
    /// Path the next stage should read: the rewrite, or the untouched input
    pub fn effective_path<'a>(&'a self, input: &'a Path) -> &'a Path {
        match self {
            Outcome::Produced(reduced) => &reduced.path,
            Outcome::Skipped(_) => input,
        }
    }
}

/// Shrink `path` towards `target_bytes`.
///
/// Files already within budget are skipped without any write. Otherwise a
/// sibling `<stem>.reduced.pdf` is written and the source is left in place.
pub fn reduce(path: &Path, target_bytes: u64) -> Result<Outcome<ReducedPdf>, PdfError> {
    let input_bytes = fs::metadata(path)?.len();

    let Some(plan) = CompressionPlan::for_sizes(input_bytes, target_bytes) else {
        tracing::debug!(
            size_bytes = input_bytes,
            target_bytes,
            "PDF within size budget, skipping reduction"
        );
        return Ok(Outcome::Skipped(SkipReason::WithinBudget {
            size_bytes: input_bytes,
            target_bytes,
        }));
    };

    let mut doc = Document::load(path)?;
    let page_count = apply_page_scale(&mut doc, plan.scale)?;

    let output_path = reduced_path_for(path);
    doc.save(&output_path)
        .map_err(|e| PdfError::Write(format!("{}: {}", output_path.display(), e)))?;
    let output_bytes = fs::metadata(&output_path)?.len();

    tracing::info!(
        input_bytes,
        output_bytes,
        target_bytes,
        ratio = plan.ratio,
        scale = plan.scale,
        page_count,
        "Rescaled PDF pages"
    );

    if output_bytes > target_bytes {
        tracing::debug!(
            output_bytes,
            target_bytes,
            "Rescaled PDF is still over budget"
        );
    }

    Ok(Outcome::Produced(ReducedPdf {
        path: output_path,
        ratio: plan.ratio,
        scale: plan.scale,
        page_count,
        input_bytes,
        output_bytes,
    }))
}

/// Set the same zoom on every page, in page order. Returns the page count.
fn apply_page_scale(doc: &mut Document, scale: f64) -> Result<usize, PdfError> {
    if doc.version.as_str() < USER_UNIT_MIN_VERSION {
        doc.version = USER_UNIT_MIN_VERSION.to_string();
    }

    let pages = doc.get_pages();
    for page_id in pages.values() {
        let page = doc
            .get_object_mut(*page_id)
            .and_then(Object::as_dict_mut)?;
        page.set("UserUnit", Object::Real(scale as f32));
    }

    Ok(pages.len())
}

fn reduced_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    path.with_file_name(format!("{}.reduced.pdf", stem))
}

//! Summarize Routes
//!
//! Endpoints:
//! - GET  /                  - Upload form
//! - POST /summarize         - Upload a PDF, get an HTML result page
//! - POST /api/v1/summarize  - Upload a PDF, get the report as JSON

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::html;
use crate::pipeline::PipelineReport;
use crate::state::AppState;

/// Multipart field names accepted for the uploaded file
const FILE_FIELDS: [&str; 2] = ["file", "pdf"];

/// Create the summarize router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/summarize", post(summarize_page))
        .route("/api/v1/summarize", post(summarize_json))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// A file pulled out of a multipart request
struct Upload {
    file_name: String,
    data: Vec<u8>,
}

/// Keep the status multer reports, so a body over the limit stays a 413
fn upload_error(e: MultipartError) -> AppError {
    tracing::error!("Failed to read upload: {}", e);
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::BadRequest(format!("Failed to read upload: {}", e.body_text())),
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            tracing::debug!("Ignoring multipart field '{}'", name);
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());

        let data = field.bytes().await.map_err(upload_error)?;

        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        tracing::debug!("Read {} bytes of '{}'", data.len(), file_name);
        return Ok(Upload {
            file_name,
            data: data.to_vec(),
        });
    }

    Err(AppError::BadRequest(
        "No PDF in upload (expected a 'file' field)".to_string(),
    ))
}

async fn process(state: &AppState, multipart: Multipart) -> Result<PipelineReport> {
    let upload = read_upload(multipart).await?;
    state
        .pipeline()
        .run(&upload.file_name, upload.data)
        .await
}

/// GET /
async fn index() -> Html<String> {
    Html(html::upload_page())
}

/// POST /summarize
///
/// Errors are rendered as a page too, with the matching status code.
async fn summarize_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    match process(&state, multipart).await {
        Ok(report) => Html(html::result_page(&report)).into_response(),
        Err(e) => {
            let (status, _, message) = e.describe();
            (status, Html(html::error_page(status, &message))).into_response()
        }
    }
}

/// POST /api/v1/summarize
async fn summarize_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PipelineReport>> {
    let report = process(&state, multipart).await?;
    Ok(Json(report))
}

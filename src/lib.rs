//! PDF Summarizer
//!
//! Upload a PDF, shrink it towards a byte budget, extract its text and get an
//! abstractive summary back in the browser.
//!
//! # Modules
//!
//! - `pdf`: size reducer and text extractor
//! - `summarize`: chunked summarization over pluggable model providers
//! - `pipeline`: per-request orchestration and scratch-space cleanup
//! - `routes` / `html`: the HTTP surface

pub mod config;
pub mod error;
pub mod html;
pub mod outcome;
pub mod pdf;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod summarize;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full router for the given state
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().pipeline.max_upload_bytes;

    Router::new()
        .merge(routes::health::router())
        .merge(routes::summarize::router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

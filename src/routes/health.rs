//! Health check

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::summarize::SummaryProvider;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    provider: SummaryProvider,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.pipeline().summarizer().provider_type(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/health", get(health_check))
}

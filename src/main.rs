//! PDF Summarizer Server
//!
//! Serves the upload page and runs each uploaded PDF through
//! reduce → extract → summarize.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_summarizer::config::Config;
use pdf_summarizer::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdf_summarizer=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("Starting PDF Summarizer v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Summarizer: {:?} model '{}' at {}",
        config.summarizer.provider,
        config.summarizer.model,
        config.summarizer.base_url
    );
    tracing::info!(
        "Target size: {} bytes, chunk size: {}, summary length: {}..{}",
        config.pipeline.target_size_bytes,
        config.pipeline.chunk_size,
        config.pipeline.min_length,
        config.pipeline.max_length
    );

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST '{}'", config.server.host))?;
    let addr = SocketAddr::from((host, config.server.port));

    // The model provider is built once here and shared by every request
    let app_state = AppState::new(config);

    if !app_state.pipeline().summarizer().is_available().await {
        tracing::warn!("Summarization provider is not reachable yet; requests will fail until it is");
    }

    let app = pdf_summarizer::app(app_state);

    tracing::info!("PDF Summarizer listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

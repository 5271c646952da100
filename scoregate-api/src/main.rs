//! scoregate-api - Assessment scoring ingest gateway
//!
//! Accepts tech-health, AI-readiness and digital-readiness submissions over
//! HTTP, validates and normalizes them, and forwards canonical rows to the
//! analytics sink. Serves the latest tech-health score from a local cache
//! file or a live sink query.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use scoregate_api::{build_router, AppState};
use scoregate_common::config::ServiceConfig;

/// Command-line overrides; everything else comes from environment and the
/// platform config file
#[derive(Debug, Parser)]
#[command(name = "scoregate-api", version)]
struct Args {
    /// Bind host override
    #[arg(long)]
    host: Option<String>,

    /// Bind port override
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting scoregate-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let mut config = ServiceConfig::load()?;
    if let Some(host) = args.host {
        config.bind_host = host;
    }
    if let Some(port) = args.port {
        config.bind_port = port;
    }

    match &config.ingest_endpoint {
        Some(endpoint) => info!("Ingest endpoint: {}", endpoint),
        None => info!("No ingest endpoint configured, running in dev mode (rows accepted locally)"),
    }
    info!("Latest cache path: {}", config.cache_path.display());

    let addr = format!("{}:{}", config.bind_host, config.bind_port);
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("scoregate-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

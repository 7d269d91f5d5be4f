//! HTTP server for course recommendations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scorer::ProcessScorer;
use server::{build_router, open_catalog, AppState, RecommendationOrchestrator, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "course-recs-server")]
#[command(about = "Serve course recommendations over HTTP", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(long, env = "COURSE_RECS_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding bind_addr from the config file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Starting course-recs server v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ServerConfig::load(path)?
        }
        None => {
            info!("No configuration file given, using defaults");
            ServerConfig::default()
        }
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let catalog = open_catalog(&config.catalog).await?;
    info!("Catalog '{}' ready", catalog.name());

    let scorer = Arc::new(ProcessScorer::new(config.scorer.clone()));
    let orchestrator = RecommendationOrchestrator::new(scorer, catalog, config.limits);
    let app = build_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

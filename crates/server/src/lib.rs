//! Server crate for the course recommendation service.
//!
//! This crate contains the orchestrator that coordinates the scorer,
//! decoder and catalog enrichment, and the HTTP layer in front of it.

use std::sync::Arc;

use anyhow::{Context, Result};
use catalog::{CatalogIndex, CourseCatalog, SqliteCatalog};
use tracing::info;

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;

pub use auth::Caller;
pub use config::{CatalogSettings, LimitPolicy, ServerConfig};
pub use error::RecommendationError;
pub use http::{build_router, AppState};
pub use orchestrator::RecommendationOrchestrator;

/// Open the catalog described by `settings`.
///
/// A database URL wins over the data directory. The `.dat` files are parsed
/// on the blocking pool.
pub async fn open_catalog(settings: &CatalogSettings) -> Result<Arc<dyn CourseCatalog>> {
    if let Some(url) = &settings.database_url {
        let catalog = SqliteCatalog::connect_readonly(url)
            .await
            .with_context(|| format!("Failed to open catalog database {}", url))?;
        info!("Using catalog database {}", url);
        return Ok(Arc::new(catalog));
    }

    let data_dir = settings.data_dir.clone();
    let index = tokio::task::spawn_blocking(move || CatalogIndex::load_from_files(&data_dir))
        .await
        .context("Catalog loading task panicked")?
        .with_context(|| format!("Failed to load catalog from {}", settings.data_dir.display()))?;
    Ok(Arc::new(index))
}

//! Server configuration.
//!
//! Everything has a default, so an empty file (or no file at all) yields a
//! server that runs the stock Python scorer against `data/catalog`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scorer::ScorerConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    pub limits: LimitPolicy,
    pub scorer: ScorerConfig,
    pub catalog: CatalogSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            limits: LimitPolicy::default(),
            scorer: ScorerConfig::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// How many recommendations to ask the scorer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitPolicy {
    /// Used when the request gives no usable limit
    pub default_limit: usize,
    /// Requested limits above this are clamped
    pub max_limit: usize,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            default_limit: 3,
            max_limit: 20,
        }
    }
}

impl LimitPolicy {
    /// Resolve the raw `limit` query value.
    ///
    /// Absent, non-numeric and zero values fall back to `default_limit`.
    pub fn resolve(&self, param: Option<&str>) -> usize {
        let requested = param
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&limit| limit > 0)
            .unwrap_or(self.default_limit);
        requested.min(self.max_limit.max(1))
    }
}

/// Where course details come from.
///
/// `database_url` takes precedence when both are set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub database_url: Option<String>,
    pub data_dir: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            data_dir: PathBuf::from("data/catalog"),
        }
    }
}

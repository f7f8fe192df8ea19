//! TOML configuration.
//!
//! ```toml
//! [catalog]
//! path = "./data/graduate_catalog.pdf"
//! source_url = "https://catalog.example.edu/graduate.pdf"
//! fetch_timeout_secs = 300
//!
//! [search]
//! max_results = 50
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```
//!
//! Only `catalog.path` is required.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://catalog.northeastern.edu/pdf/Northeastern%20University%202024-2025%20Graduate%20Catalog.pdf";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Local copy of the catalog document. Fetched here when missing.
    pub path: PathBuf,
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl CatalogConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}
fn default_fetch_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Defaults with the catalog stored under `./data`.
    pub fn minimal() -> Self {
        Self {
            catalog: CatalogConfig {
                path: PathBuf::from("./data/graduate_catalog.pdf"),
                source_url: default_source_url(),
                fetch_timeout_secs: default_fetch_timeout_secs(),
            },
            search: SearchConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content).with_context(|| "Failed to parse config file")
}

/// Parses and validates configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.catalog.path.as_os_str().is_empty() {
        anyhow::bail!("catalog.path must not be empty");
    }

    let url = config.catalog.source_url.as_str();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!(
            "catalog.source_url must be an http(s) URL, got '{}'",
            url
        );
    }

    if config.catalog.fetch_timeout_secs == 0 {
        anyhow::bail!("catalog.fetch_timeout_secs must be > 0");
    }

    if config.search.max_results < 1 {
        anyhow::bail!("search.max_results must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}

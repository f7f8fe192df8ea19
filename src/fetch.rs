//! Catalog document acquisition.
//!
//! The document is read from `catalog.path`. When the file is missing it is
//! downloaded from `catalog.source_url` first, with the configured timeout
//! covering the whole request. Downloads land in a `.part` file that is
//! renamed into place only after every byte has been written, so an
//! interrupted fetch never leaves a truncated catalog behind.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{CatalogConfig, Config};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetching {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads `url` to `dest`, returning the number of bytes written.
pub async fn download(url: &str, dest: &Path, timeout: Duration) -> Result<u64, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| request_error(url, timeout, e))?;

    info!(url, timeout_secs = timeout.as_secs(), "downloading catalog");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| request_error(url, timeout, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| request_error(url, timeout, e))?;

    persist(dest, &bytes).await?;
    info!(path = %dest.display(), bytes = bytes.len(), "catalog saved");
    Ok(bytes.len() as u64)
}

fn request_error(url: &str, timeout: Duration, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: e,
        }
    }
}

async fn persist(dest: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| FetchError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let part = part_path(dest);
    let written = match tokio::fs::write(&part, bytes).await {
        Ok(()) => tokio::fs::rename(&part, dest).await.map_err(|source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        }),
        Err(source) => Err(FetchError::Io {
            path: part.clone(),
            source,
        }),
    };

    if written.is_err() {
        let _ = tokio::fs::remove_file(&part).await;
    }
    written
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// The catalog document on disk, fetched on first use.
///
/// Acquisition is serialized so concurrent loaders share one download.
#[derive(Debug)]
pub struct DocumentSource {
    path: PathBuf,
    url: String,
    timeout: Duration,
    lock: Mutex<()>,
}

impl DocumentSource {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
            timeout,
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(catalog: &CatalogConfig) -> Self {
        Self::new(
            catalog.path.clone(),
            catalog.source_url.clone(),
            catalog.fetch_timeout(),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes sure the document exists locally, downloading it if needed.
    pub async fn ensure_local(&self) -> Result<(), FetchError> {
        let _guard = self.lock.lock().await;
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }
        warn!(path = %self.path.display(), "catalog not found locally, fetching");
        download(&self.url, &self.path, self.timeout).await?;
        Ok(())
    }

    /// Reads the whole document, fetching it first if it is missing.
    pub async fn read(&self) -> Result<Vec<u8>, FetchError> {
        self.ensure_local().await?;
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Downloads the document again, replacing any local copy.
    pub async fn refresh(&self) -> Result<u64, FetchError> {
        let _guard = self.lock.lock().await;
        download(&self.url, &self.path, self.timeout).await
    }
}

/// `catalog fetch`: downloads the catalog unless a local copy exists.
pub async fn run_fetch(config: &Config, force: bool) -> Result<()> {
    let source = DocumentSource::from_config(&config.catalog);

    if !force && source.path().exists() {
        println!("catalog already present: {}", source.path().display());
        println!("  use --force to download again");
        return Ok(());
    }

    let bytes = source.refresh().await?;
    println!("fetch");
    println!("  source: {}", config.catalog.source_url);
    println!("  saved: {}", source.path().display());
    println!("  bytes: {}", bytes);
    println!("ok");
    Ok(())
}

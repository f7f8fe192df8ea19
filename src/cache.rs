//! Process-lifetime record cache.
//!
//! Each [`CatalogCache`] holds one record kind. The first call to
//! [`CatalogCache::records`] runs its [`CatalogLoader`]; concurrent first
//! callers wait on the same run, and every later call gets the stored list.
//! The list is never replaced once set.
//!
//! Loading never fails from the caller's point of view. A missing document
//! that cannot be fetched, an unreadable file, or a crashed parse all leave
//! an empty catalog behind and a logged error.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::extract::{open_document, Document, ExtractError, PageSource};
use crate::fetch::{DocumentSource, FetchError};
use crate::models::{CatalogRecord, RecordKind};
use crate::pipeline::{self, ParseReport};

/// Produces the full record list for one cache.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self) -> Vec<CatalogRecord>;
}

/// One-shot, immutable cache of one record kind.
pub struct CatalogCache {
    kind: RecordKind,
    loader: Box<dyn CatalogLoader>,
    records: OnceCell<Arc<Vec<CatalogRecord>>>,
}

impl CatalogCache {
    pub fn new(kind: RecordKind, loader: Box<dyn CatalogLoader>) -> Self {
        Self {
            kind,
            loader,
            records: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// All records, loading them on first access.
    pub async fn records(&self) -> Arc<Vec<CatalogRecord>> {
        self.records
            .get_or_init(|| async {
                let records = self.loader.load().await;
                info!(kind = %self.kind, count = records.len(), "catalog cached");
                Arc::new(records)
            })
            .await
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.records.initialized()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("catalog document unavailable: {0}")]
    Fetch(#[from] FetchError),
    #[error("catalog document could not be opened: {0}")]
    Open(#[from] ExtractError),
    #[error("parse worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// The catalog document, acquired and opened at most once and shared by
/// every loader that parses it.
pub struct SharedDocument {
    source: Arc<DocumentSource>,
    opened: OnceCell<Arc<Document>>,
}

impl SharedDocument {
    pub fn new(source: Arc<DocumentSource>) -> Self {
        Self {
            source,
            opened: OnceCell::new(),
        }
    }

    /// The opened document. A failed attempt is not stored, so the next
    /// caller tries again.
    pub async fn get(&self) -> Result<Arc<Document>, LoadError> {
        self.opened
            .get_or_try_init(|| async {
                let bytes = self.source.read().await?;
                let document =
                    tokio::task::spawn_blocking(move || open_document(&bytes)).await??;
                info!(pages = document.page_count(), "catalog document opened");
                Ok::<_, LoadError>(Arc::new(document))
            })
            .await
            .cloned()
    }

    pub fn is_opened(&self) -> bool {
        self.opened.initialized()
    }
}

/// Loads records of one kind by parsing the shared catalog document.
pub struct DocumentLoader {
    kind: RecordKind,
    document: Arc<SharedDocument>,
}

impl DocumentLoader {
    pub fn new(kind: RecordKind, document: Arc<SharedDocument>) -> Self {
        Self { kind, document }
    }

    /// Acquires the document and parses it on a blocking worker.
    pub async fn try_load(&self) -> Result<ParseReport, LoadError> {
        let document = self.document.get().await?;
        let kind = self.kind;
        let report = tokio::task::spawn_blocking(move || pipeline::parse(kind, &*document)).await?;
        Ok(report)
    }
}

#[async_trait]
impl CatalogLoader for DocumentLoader {
    async fn load(&self) -> Vec<CatalogRecord> {
        match self.try_load().await {
            Ok(report) => {
                if !report.failed_pages.is_empty() {
                    info!(
                        kind = %self.kind,
                        failed = report.failed_pages.len(),
                        "some pages were skipped"
                    );
                }
                report.records
            }
            Err(e) => {
                error!(
                    kind = %self.kind,
                    error = %e,
                    "catalog load failed; serving an empty catalog"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::models::Classification;

    const TWO_PAGES: &str = "CS 5100 Foundations of Artificial Intelligence\n\x0c\
                             CS 5200 Database Management Systems\n\
                             Data Science, MS\n";

    fn shared(path: &std::path::Path) -> Arc<SharedDocument> {
        Arc::new(SharedDocument::new(Arc::new(DocumentSource::new(
            path,
            "http://127.0.0.1:9/unused.pdf",
            Duration::from_secs(1),
        ))))
    }

    struct CountingLoader {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CatalogLoader for CountingLoader {
        async fn load(&self) -> Vec<CatalogRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            vec![CatalogRecord {
                kind: RecordKind::Course,
                id: "CS 5100".to_string(),
                name: "Foundations of Artificial Intelligence".to_string(),
                description: String::new(),
                classification: Classification {
                    department: "Computer Science".to_string(),
                    college: "Khoury College of Computer Sciences".to_string(),
                },
                keywords: Default::default(),
                credits: Some(4.0),
                concentrations: Vec::new(),
                page: Some(1),
            }]
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_access_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(CatalogCache::new(
            RecordKind::Course,
            Box::new(CountingLoader {
                calls: calls.clone(),
            }),
        ));
        assert!(!cache.is_loaded());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.records().await })
            })
            .collect();

        let mut lists = Vec::new();
        for handle in handles {
            lists.push(handle.await.unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lists.iter().all(|l| Arc::ptr_eq(l, &lists[0])));
        assert!(cache.is_loaded());

        cache.records().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn document_loader_parses_local_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.txt");
        std::fs::write(&path, TWO_PAGES).unwrap();

        let report = DocumentLoader::new(RecordKind::Course, shared(&path))
            .try_load()
            .await
            .unwrap();
        assert_eq!(report.pages, 2);
        assert_eq!(report.records.len(), 2);
    }

    #[tokio::test]
    async fn unreadable_document_becomes_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, "%PDF-1.4 garbage").unwrap();

        let loader = DocumentLoader::new(RecordKind::Course, shared(&path));
        assert!(matches!(loader.try_load().await, Err(LoadError::Open(_))));

        let cache = CatalogCache::new(RecordKind::Course, Box::new(loader));
        assert!(cache.records().await.is_empty());
        assert!(cache.is_loaded());
    }

    #[tokio::test]
    async fn course_and_program_loaders_share_one_opened_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.txt");
        std::fs::write(&path, TWO_PAGES).unwrap();
        let document = shared(&path);

        let courses = DocumentLoader::new(RecordKind::Course, document.clone());
        assert_eq!(courses.try_load().await.unwrap().records.len(), 2);
        assert!(document.is_opened());

        // Later loads never go back to the file.
        std::fs::remove_file(&path).unwrap();
        let programs = DocumentLoader::new(RecordKind::Program, document.clone());
        let report = programs.try_load().await.unwrap();
        assert_eq!(report.pages, 2);

        let first = document.get().await.unwrap();
        let again = document.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
}

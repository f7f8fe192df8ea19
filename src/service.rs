//! The catalog service: one cache per record kind over a shared document.
//!
//! This is the object the CLI and the HTTP server hold. It is cheap to share
//! behind an `Arc`, and nothing is parsed until a record list or a non-empty
//! search is first requested.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{CatalogCache, CatalogLoader, DocumentLoader, SharedDocument};
use crate::config::Config;
use crate::fetch::DocumentSource;
use crate::models::{CatalogRecord, RecordKind, SearchResult};
use crate::search::{search, Query};

pub struct CatalogService {
    courses: CatalogCache,
    programs: CatalogCache,
    max_results: usize,
}

impl CatalogService {
    /// Builds a service whose caches load from the configured document. Both
    /// caches parse the same opened document.
    pub fn from_config(config: &Config) -> Self {
        let source = Arc::new(DocumentSource::from_config(&config.catalog));
        let document = Arc::new(SharedDocument::new(source));
        Self::new(
            Box::new(DocumentLoader::new(RecordKind::Course, document.clone())),
            Box::new(DocumentLoader::new(RecordKind::Program, document)),
            config.search.max_results,
        )
    }

    pub fn new(
        courses: Box<dyn CatalogLoader>,
        programs: Box<dyn CatalogLoader>,
        max_results: usize,
    ) -> Self {
        Self {
            courses: CatalogCache::new(RecordKind::Course, courses),
            programs: CatalogCache::new(RecordKind::Program, programs),
            max_results,
        }
    }

    pub fn cache(&self, kind: RecordKind) -> &CatalogCache {
        match kind {
            RecordKind::Course => &self.courses,
            RecordKind::Program => &self.programs,
        }
    }

    /// The full deduplicated record list for `kind`.
    pub async fn records(&self, kind: RecordKind) -> Arc<Vec<CatalogRecord>> {
        self.cache(kind).records().await
    }

    /// Ranked search over `kind`. A blank query returns immediately without
    /// touching the catalog.
    pub async fn search(
        &self,
        kind: RecordKind,
        raw_query: &str,
        limit: Option<usize>,
    ) -> Vec<SearchResult> {
        let query = Query::parse(raw_query);
        if query.is_empty() {
            debug!(raw_query, "blank query");
            return Vec::new();
        }

        let records = self.records(kind).await;
        search(&records, &query, limit.unwrap_or(self.max_results))
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

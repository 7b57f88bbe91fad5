//! Process-scoped search indexes, one per repository id.
//!
//! Lifecycle: created on the first `build_index` for an id, replaced on
//! re-analysis, removed by `evict`. With a capacity set, registering a new
//! id beyond it evicts the least recently built index.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::SearchConfig;
use crate::error::{AnalysisError, Result};
use crate::ingest::Symbol;
use crate::scan::FileInfo;

use super::index::{SearchIndex, SearchPage, SearchResult};

#[derive(Debug)]
struct RegistryEntry {
    index: Arc<SearchIndex>,
    built: u64,
}

/// Concurrent map of repository id to [`SearchIndex`].
///
/// Queries clone the index `Arc` and release the shard lock before scoring,
/// so a rebuild of one repository never waits on searches of another.
#[derive(Debug)]
pub struct IndexRegistry {
    indexes: DashMap<String, RegistryEntry>,
    clock: AtomicU64,
    config: SearchConfig,
    capacity: Option<usize>,
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::new(SearchConfig::default(), None)
    }
}

impl IndexRegistry {
    pub fn new(config: SearchConfig, capacity: Option<usize>) -> Self {
        Self {
            indexes: DashMap::new(),
            clock: AtomicU64::new(0),
            config,
            capacity,
        }
    }

    /// Build and register the index of a repository, replacing any previous one.
    pub fn build_index(&self, repo_id: &str, symbols: &[Symbol], files: &[FileInfo]) -> Arc<SearchIndex> {
        let index = Arc::new(SearchIndex::build(symbols, files, &self.config));
        let built = self.clock.fetch_add(1, Ordering::Relaxed);
        self.indexes.insert(
            repo_id.to_string(),
            RegistryEntry {
                index: Arc::clone(&index),
                built,
            },
        );
        tracing::info!(repo_id, documents = index.len(), "search index registered");
        self.enforce_capacity(repo_id);
        index
    }

    fn enforce_capacity(&self, keep: &str) {
        let Some(capacity) = self.capacity else {
            return;
        };
        while self.indexes.len() > capacity {
            let oldest = self
                .indexes
                .iter()
                .filter(|entry| entry.key() != keep)
                .min_by_key(|entry| entry.value().built)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(id) => {
                    self.indexes.remove(&id);
                    tracing::debug!(repo_id = %id, "search index evicted at capacity");
                }
                None => break,
            }
        }
    }

    pub fn get(&self, repo_id: &str) -> Option<Arc<SearchIndex>> {
        self.indexes.get(repo_id).map(|entry| Arc::clone(&entry.index))
    }

    /// Like [`get`](Self::get), but a missing id is an error.
    pub fn get_required(&self, repo_id: &str) -> Result<Arc<SearchIndex>> {
        self.get(repo_id)
            .ok_or_else(|| AnalysisError::UnknownRepository(repo_id.to_string()))
    }

    /// Paged, kind-filtered search; an unknown id yields an empty page.
    pub fn search(&self, repo_id: &str, query: &str, kinds: &[String], skip: usize, take: usize) -> SearchPage {
        self.get(repo_id)
            .map(|index| index.search_page(query, kinds, skip, take))
            .unwrap_or_default()
    }

    /// Unfiltered top results; an unknown id yields none.
    pub fn search_top(&self, repo_id: &str, query: &str, max_results: usize) -> Vec<SearchResult> {
        self.get(repo_id)
            .map(|index| index.search(query, max_results))
            .unwrap_or_default()
    }

    pub fn search_count(&self, repo_id: &str, query: &str, kinds: &[String]) -> usize {
        self.get(repo_id)
            .map(|index| index.search_count(query, kinds))
            .unwrap_or(0)
    }

    pub fn suggest(&self, repo_id: &str, prefix: &str, max_results: usize) -> Vec<String> {
        self.get(repo_id)
            .map(|index| index.suggest(prefix, max_results))
            .unwrap_or_default()
    }

    pub fn available_kinds(&self, repo_id: &str) -> Vec<String> {
        self.get(repo_id)
            .map(|index| index.available_kinds())
            .unwrap_or_default()
    }

    /// Remove a repository's index.
    ///
    /// # Returns
    /// Whether an index was registered under `repo_id`
    pub fn evict(&self, repo_id: &str) -> bool {
        self.indexes.remove(repo_id).is_some()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.indexes.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

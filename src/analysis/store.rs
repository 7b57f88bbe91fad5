//! Cached analyses, the input of PR impact queries.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{AnalysisError, Result};
use crate::graph::DependencyGraph;
use crate::impact::{analyze_pr_impact, ChangedFile, PrImpactResponse};
use crate::ingest::Symbol;
use crate::scan::FileInfo;

/// Files, symbols and graph of one analyzed repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAnalysis {
    pub files: Vec<FileInfo>,
    pub symbols: Vec<Symbol>,
    pub graph: DependencyGraph,
}

impl CachedAnalysis {
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_string()?).map_err(|e| AnalysisError::io(path, e))
    }
}

/// Process-scoped [`CachedAnalysis`] per repository id.
///
/// An entry is stored only once its analysis completed; re-analysis
/// replaces it, `evict` removes it.
#[derive(Debug, Default)]
pub struct AnalysisStore {
    entries: DashMap<String, Arc<CachedAnalysis>>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, repo_id: &str, analysis: CachedAnalysis) -> Arc<CachedAnalysis> {
        let analysis = Arc::new(analysis);
        self.entries.insert(repo_id.to_string(), Arc::clone(&analysis));
        analysis
    }

    pub fn get(&self, repo_id: &str) -> Option<Arc<CachedAnalysis>> {
        self.entries.get(repo_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn evict(&self, repo_id: &str) -> bool {
        self.entries.remove(repo_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// PR impact against the cached analysis of `repo_id`.
    ///
    /// # Returns
    /// `MissingRepositoryPath` for a blank id, `UnknownRepository` when
    /// nothing is cached under it
    pub fn analyze_pr_for(
        &self,
        repo_id: &str,
        pr_number: u64,
        changed: &[ChangedFile],
    ) -> Result<PrImpactResponse> {
        if repo_id.trim().is_empty() {
            return Err(AnalysisError::MissingRepositoryPath);
        }
        let cached = self
            .get(repo_id)
            .ok_or_else(|| AnalysisError::UnknownRepository(repo_id.to_string()))?;
        Ok(analyze_pr_impact(pr_number, changed, &cached))
    }
}

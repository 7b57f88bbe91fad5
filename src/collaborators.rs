//! Interfaces to the services around the analysis core.
//!
//! Fetching a remote repository, natural-language summaries and progress
//! persistence live outside this crate. The core only calls through these
//! traits; [`ProgressTracker`] is the in-process progress store used when
//! nothing else is plugged in.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::graph::RepositoryOverview;
use crate::ingest::Symbol;

/// Makes a repository available on the local filesystem.
pub trait RepositorySource: Send + Sync {
    /// Download and unpack `repo_url` under `destination`.
    ///
    /// # Returns
    /// Root directory of the unpacked repository
    fn fetch(&self, repo_url: &str, destination: &Path) -> Result<PathBuf>;
}

/// Local directories are already fetched.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSource;

impl RepositorySource for LocalSource {
    fn fetch(&self, repo_url: &str, _destination: &Path) -> Result<PathBuf> {
        let root = PathBuf::from(repo_url);
        crate::scan::ensure_repository(&root)?;
        Ok(root)
    }
}

/// Produces a prose summary of an analyzed repository.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, overview: &RepositoryOverview, symbols: &[Symbol]) -> Result<String>;
}

/// Pipeline stage reported to a [`ProgressSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisStage {
    Scanning,
    Extracting,
    Assembling,
    Indexing,
    Complete,
    Failed,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Scanning => "scanning",
            AnalysisStage::Extracting => "extracting",
            AnalysisStage::Assembling => "assembling",
            AnalysisStage::Indexing => "indexing",
            AnalysisStage::Complete => "complete",
            AnalysisStage::Failed => "failed",
        }
    }

    /// Rough completion percentage at the start of the stage.
    pub fn percent(&self) -> u8 {
        match self {
            AnalysisStage::Scanning => 0,
            AnalysisStage::Extracting => 20,
            AnalysisStage::Assembling => 80,
            AnalysisStage::Indexing => 90,
            AnalysisStage::Complete | AnalysisStage::Failed => 100,
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives pipeline progress.
pub trait ProgressSink: Send + Sync {
    fn report(&self, repo_id: &str, stage: AnalysisStage, detail: &str);
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _repo_id: &str, _stage: AnalysisStage, _detail: &str) {}
}

/// Latest progress of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub stage: AnalysisStage,
    pub percent: u8,
    pub detail: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Process-scoped progress store keyed by repository id.
///
/// Entries are created on the first report for an id, overwritten by later
/// reports and removed by [`evict`](Self::evict).
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: DashMap<String, ProgressEntry>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, repo_id: &str) -> Option<ProgressEntry> {
        self.entries.get(repo_id).map(|entry| entry.value().clone())
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
}

impl ProgressSink for ProgressTracker {
    fn report(&self, repo_id: &str, stage: AnalysisStage, detail: &str) {
        self.entries.insert(
            repo_id.to_string(),
            ProgressEntry {
                stage,
                percent: stage.percent(),
                detail: detail.to_string(),
                updated_at: chrono::Utc::now(),
            },
        );
    }
}

//! Repository analysis pipeline.
//!
//! scan → extract (every registered profile) → assemble → overview.
//!
//! The free functions run with default configuration; [`Analyzer`] carries a
//! configuration, an extraction cache, a profile selection, a cancellation
//! token and a progress sink across calls.

pub mod store;

pub use store::{AnalysisStore, CachedAnalysis};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::collaborators::{AnalysisStage, NoProgress, ProgressSink};
use crate::config::AnalysisConfig;
use crate::diagnostics::ScanDiagnostic;
use crate::error::Result;
use crate::graph::{assemble, overview, DependencyGraph, RepositoryOverview};
use crate::ingest::{ExtractionCache, ProfileOutput, ProfileRegistry, Symbol};
use crate::scan::{scan_files_with, FileInfo, ScanReport};
use crate::search::{IndexRegistry, SearchIndex};

/// Output of [`Analyzer::analyze_full`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub files: Vec<FileInfo>,
    pub symbols: Vec<Symbol>,
    pub graph: DependencyGraph,
    pub overview: RepositoryOverview,
    /// Skipped paths and per-file failures of scanning and extraction
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl FullAnalysis {
    /// Drop the overview and diagnostics, keeping what impact analysis reads.
    pub fn into_cached(self) -> CachedAnalysis {
        CachedAnalysis {
            files: self.files,
            symbols: self.symbols,
            graph: self.graph,
        }
    }
}

/// Configured analysis pipeline.
pub struct Analyzer {
    config: Arc<AnalysisConfig>,
    cache: Arc<ExtractionCache>,
    registry: ProfileRegistry,
    cancel: CancellationToken,
    progress: Arc<dyn ProgressSink>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(ExtractionCache::new()),
            registry: ProfileRegistry::default(),
            cancel: CancellationToken::new(),
            progress: Arc::new(NoProgress),
        }
    }

    /// Share an extraction cache with other analyzers.
    pub fn with_cache(mut self, cache: Arc<ExtractionCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_registry(mut self, registry: ProfileRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ExtractionCache> {
        &self.cache
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Inventory plus skip diagnostics.
    pub fn scan(&self, repo_root: &Path) -> Result<ScanReport> {
        scan_files_with(repo_root, &self.config, &self.cancel)
    }

    pub fn scan_files(&self, repo_root: &Path) -> Result<Vec<FileInfo>> {
        Ok(self.scan(repo_root)?.files)
    }

    /// Run every profile over a scanned inventory.
    ///
    /// Profiles run concurrently; outputs come back in registry order.
    pub fn extract(&self, repo_root: &Path, files: &[FileInfo]) -> Result<Vec<Arc<ProfileOutput>>> {
        let extractors = self.registry.extractors(&self.config, &self.cache, &self.cancel);
        let outputs: Vec<Arc<ProfileOutput>> = if self.config.parallel {
            extractors
                .par_iter()
                .map(|extractor| extractor.extract(repo_root, files))
                .collect::<Result<_>>()?
        } else {
            extractors
                .iter()
                .map(|extractor| extractor.extract(repo_root, files))
                .collect::<Result<_>>()?
        };
        tracing::info!(
            profiles = outputs.len(),
            symbols = outputs.iter().map(|o| o.symbols.len()).sum::<usize>(),
            "extraction complete"
        );
        Ok(outputs)
    }

    /// Every symbol of every profile, in registry order.
    pub fn extract_symbols(&self, repo_root: &Path) -> Result<Vec<Symbol>> {
        let files = self.scan_files(repo_root)?;
        let outputs = self.extract(repo_root, &files)?;
        Ok(collect_symbols(&outputs))
    }

    pub fn build_dependency_graph(&self, repo_root: &Path) -> Result<DependencyGraph> {
        let files = self.scan_files(repo_root)?;
        let outputs = self.extract(repo_root, &files)?;
        Ok(assemble(&files, outputs.iter().map(|o| o.as_ref())))
    }

    /// Files, symbols, graph and overview from a single walk.
    ///
    /// # Arguments
    /// * `repo_root` - Local repository root
    /// * `repo_url` - Source URL recorded in the overview
    pub fn analyze_full(&self, repo_root: &Path, repo_url: Option<&str>) -> Result<FullAnalysis> {
        let repo_id = repo_url
            .map(str::to_string)
            .unwrap_or_else(|| repo_root.display().to_string());
        let full = self.tracked(&repo_id, || self.run_full(&repo_id, repo_root, repo_url))?;
        self.progress.report(
            &repo_id,
            AnalysisStage::Complete,
            &format!("{} symbols", full.symbols.len()),
        );
        Ok(full)
    }

    /// Run `step`, reporting `Failed` to the progress sink if it errors.
    fn tracked<T>(&self, repo_id: &str, step: impl FnOnce() -> Result<T>) -> Result<T> {
        let result = step();
        if let Err(err) = &result {
            self.progress.report(repo_id, AnalysisStage::Failed, &err.to_string());
        }
        result
    }

    fn run_full(&self, repo_id: &str, repo_root: &Path, repo_url: Option<&str>) -> Result<FullAnalysis> {
        self.progress.report(repo_id, AnalysisStage::Scanning, "");
        let report = self.scan(repo_root)?;

        self.progress.report(
            repo_id,
            AnalysisStage::Extracting,
            &format!("{} files", report.files.len()),
        );
        let outputs = self.extract(repo_root, &report.files)?;

        self.progress.report(repo_id, AnalysisStage::Assembling, "");
        let graph = assemble(&report.files, outputs.iter().map(|o| o.as_ref()));
        let symbols = collect_symbols(&outputs);
        let overview = overview(repo_url, &report.files, &symbols, &graph);

        let mut diagnostics = report.diagnostics;
        for output in &outputs {
            diagnostics.extend(output.diagnostics.iter().cloned());
        }
        diagnostics.sort();

        tracing::info!(
            repo = %repo_id,
            files = report.files.len(),
            symbols = symbols.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "analysis complete"
        );
        Ok(FullAnalysis {
            files: report.files,
            symbols,
            graph,
            overview,
            diagnostics,
        })
    }

    /// Full analysis, then cache it and register its search index.
    ///
    /// Nothing is stored when the analysis fails or is cancelled.
    pub fn analyze_and_register(
        &self,
        repo_id: &str,
        repo_root: &Path,
        repo_url: Option<&str>,
        store: &AnalysisStore,
        indexes: &IndexRegistry,
    ) -> Result<(FullAnalysis, Arc<SearchIndex>)> {
        let full = self.tracked(repo_id, || {
            let full = self.run_full(repo_id, repo_root, repo_url)?;
            self.cancel.check()?;
            Ok(full)
        })?;
        self.progress.report(repo_id, AnalysisStage::Indexing, "");
        let index = indexes.build_index(repo_id, &full.symbols, &full.files);
        store.insert(repo_id, full.clone().into_cached());
        self.progress.report(
            repo_id,
            AnalysisStage::Complete,
            &format!("{} documents", index.len()),
        );
        Ok((full, index))
    }
}

fn collect_symbols(outputs: &[Arc<ProfileOutput>]) -> Vec<Symbol> {
    outputs
        .iter()
        .flat_map(|o| o.symbols.iter().cloned())
        .collect()
}

/// Inventory with default configuration.
pub fn scan_files(repo_root: &Path) -> Result<Vec<FileInfo>> {
    Analyzer::default().scan_files(repo_root)
}

/// Symbols of every built-in profile with default configuration.
pub fn extract_symbols(repo_root: &Path) -> Result<Vec<Symbol>> {
    Analyzer::default().extract_symbols(repo_root)
}

/// Assembled graph with default configuration.
pub fn build_dependency_graph(repo_root: &Path) -> Result<DependencyGraph> {
    Analyzer::default().build_dependency_graph(repo_root)
}

/// Single-walk full analysis with default configuration.
pub fn analyze_full(repo_root: &Path, repo_url: Option<&str>) -> Result<FullAnalysis> {
    Analyzer::default().analyze_full(repo_root, repo_url)
}

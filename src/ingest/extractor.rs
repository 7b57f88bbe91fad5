//! Profile-driven extractors and the repository link step.
//!
//! A [`ProfileExtractor`] runs one [`LanguageProfile`] over every file of a
//! repository the profile reads, then links the per-file results:
//! - base type and mixin names resolve to the first declared type with that
//!   simple name (sorted path order, then line order)
//! - import tokens resolve through [`ImportResolver`] to `module:` nodes
//!
//! Symbols and dependencies come from the same pass, memoized in an
//! [`ExtractionCache`] so asking for both costs one scan.

use rayon::prelude::*;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::common::extension;
use crate::config::AnalysisConfig;
use crate::diagnostics::{DiagnosticStage, ScanDiagnostic, SkipReason};
use crate::error::Result;
use crate::graph::{ids, GraphBuilder, GraphEdge, GraphNode, NodeType, Relationship};
use crate::ingest::cache::{fingerprint, ExtractionCache};
use crate::ingest::engine::{extract_file, module_node, BaseSource, FileExtraction};
use crate::ingest::imports::{ImportResolver, PathIndex};
use crate::ingest::profile::LanguageProfile;
use crate::ingest::{profiles, Language, Symbol};
use crate::scan::{scan_files_with, FileInfo};

/// Everything one profile extracted from one repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileOutput {
    /// Symbols of every file, in path order then line order
    pub symbols: Vec<Symbol>,
    /// Deduplicated by id, first writer wins
    pub nodes: Vec<GraphNode>,
    /// Not deduplicated
    pub edges: Vec<GraphEdge>,
    /// Oversized, unreadable and failed files
    pub diagnostics: Vec<ScanDiagnostic>,
    /// Files scanned line by line
    pub files_processed: usize,
}

/// Capability interface of one language's extraction.
///
/// Both operations are backed by the same per-repository pass.
pub trait LanguageExtractor: Send + Sync {
    /// Stable id (`csharp`, `python`, ...)
    fn id(&self) -> &'static str;

    fn language(&self) -> Language;

    /// Full output over a pre-scanned inventory, avoiding a second walk.
    fn extract(&self, repo_root: &Path, files: &[FileInfo]) -> Result<Arc<ProfileOutput>>;

    /// Walk the repository and return every symbol this language declares.
    fn extract_symbols(&self, repo_root: &Path) -> Result<Vec<Symbol>>;

    /// Walk the repository and return this language's nodes and edges.
    fn build_dependencies(&self, repo_root: &Path) -> Result<(Vec<GraphNode>, Vec<GraphEdge>)>;
}

/// [`LanguageExtractor`] interpreting a [`LanguageProfile`] table.
pub struct ProfileExtractor {
    profile: &'static LanguageProfile,
    config: Arc<AnalysisConfig>,
    cache: Arc<ExtractionCache>,
    cancel: CancellationToken,
}

impl ProfileExtractor {
    pub fn new(
        profile: &'static LanguageProfile,
        config: Arc<AnalysisConfig>,
        cache: Arc<ExtractionCache>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            profile,
            config,
            cache,
            cancel,
        }
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        self.profile
    }

    fn walk_and_extract(&self, repo_root: &Path) -> Result<Arc<ProfileOutput>> {
        let report = scan_files_with(repo_root, &self.config, &self.cancel)?;
        self.extract(repo_root, &report.files)
    }

    /// Extract every file of the inventory this profile reads, then link.
    fn run(&self, repo_root: &Path, files: &[FileInfo]) -> Result<ProfileOutput> {
        let mine: Vec<&FileInfo> = files.iter().filter(|f| self.reads(&f.relative_path)).collect();
        tracing::debug!(profile = self.profile.id, files = mine.len(), "extracting");

        let extract = |info: &&FileInfo| -> Result<FileOutcome> {
            self.cancel.check()?;
            Ok(self.extract_one(repo_root, info))
        };
        let outcomes: Vec<FileOutcome> = if self.config.parallel {
            mine.par_iter().map(extract).collect::<Result<_>>()?
        } else {
            mine.iter().map(extract).collect::<Result<_>>()?
        };
        self.cancel.check()?;

        let index = PathIndex::new(
            files
                .iter()
                .filter(|f| has_profile(&f.relative_path))
                .map(|f| f.relative_path.clone()),
        );
        Ok(link(self.profile, &mine, outcomes, &index))
    }

    fn reads(&self, rel_path: &str) -> bool {
        extension(rel_path).is_some_and(|ext| self.profile.handles_extension(&ext))
    }

    fn extract_one(&self, repo_root: &Path, info: &FileInfo) -> FileOutcome {
        let rel = info.relative_path.as_str();
        if info.size_bytes > self.config.max_extract_file_bytes {
            tracing::debug!(path = rel, size = info.size_bytes, "oversized, module node only");
            return FileOutcome::Skipped {
                module: Some(module_node(self.profile, rel)),
                diagnostic: ScanDiagnostic::skipped(rel, SkipReason::Oversized),
            };
        }
        let bytes = match std::fs::read(repo_root.join(rel)) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = rel, error = %err, "unreadable file");
                return FileOutcome::Skipped {
                    module: None,
                    diagnostic: ScanDiagnostic::skipped(rel, SkipReason::Unreadable),
                };
            }
        };
        let source = String::from_utf8_lossy(&bytes);
        let profile = self.profile;
        match panic::catch_unwind(AssertUnwindSafe(|| extract_file(profile, rel, &source))) {
            Ok(extraction) => FileOutcome::Extracted(extraction),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(path = rel, profile = profile.id, %message, "extraction failed");
                FileOutcome::Skipped {
                    module: None,
                    diagnostic: ScanDiagnostic::profile_error(
                        rel,
                        profile.id,
                        DiagnosticStage::Extract,
                        message,
                    ),
                }
            }
        }
    }
}

impl LanguageExtractor for ProfileExtractor {
    fn id(&self) -> &'static str {
        self.profile.id
    }

    fn language(&self) -> Language {
        self.profile.language
    }

    fn extract(&self, repo_root: &Path, files: &[FileInfo]) -> Result<Arc<ProfileOutput>> {
        let print = fingerprint(repo_root, files);
        self.cache
            .get_or_compute(self.profile.id, repo_root, print, || self.run(repo_root, files))
    }

    fn extract_symbols(&self, repo_root: &Path) -> Result<Vec<Symbol>> {
        Ok(self.walk_and_extract(repo_root)?.symbols.clone())
    }

    fn build_dependencies(&self, repo_root: &Path) -> Result<(Vec<GraphNode>, Vec<GraphEdge>)> {
        let output = self.walk_and_extract(repo_root)?;
        Ok((output.nodes.clone(), output.edges.clone()))
    }
}

/// Result of one file before linking.
enum FileOutcome {
    Extracted(FileExtraction),
    Skipped {
        module: Option<GraphNode>,
        diagnostic: ScanDiagnostic,
    },
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "profile panicked".to_string()
    }
}

/// Whether some built-in profile reads the file, i.e. it has a module node.
fn has_profile(rel_path: &str) -> bool {
    extension(rel_path)
        .is_some_and(|ext| profiles::all().iter().any(|p| p.handles_extension(&ext)))
}

/// Merge per-file outcomes and resolve cross-file references.
///
/// `files` and `outcomes` are parallel and in path order.
fn link(
    profile: &LanguageProfile,
    files: &[&FileInfo],
    outcomes: Vec<FileOutcome>,
    index: &PathIndex,
) -> ProfileOutput {
    let mut builder = GraphBuilder::new();
    let mut output = ProfileOutput::default();
    let mut extracted: Vec<(&str, FileExtraction)> = Vec::new();

    for (info, outcome) in files.iter().zip(outcomes) {
        match outcome {
            FileOutcome::Extracted(extraction) => {
                output.files_processed += 1;
                builder.extend(&extraction.nodes, &extraction.edges);
                extracted.push((info.relative_path.as_str(), extraction));
            }
            FileOutcome::Skipped { module, diagnostic } => {
                if let Some(node) = module {
                    builder.add_node(node);
                }
                output.diagnostics.push(diagnostic);
            }
        }
    }

    // first declaration wins: path order, then line order within a file
    let mut types: HashMap<&str, (&str, NodeType)> = HashMap::new();
    for (_, extraction) in &extracted {
        for declared in &extraction.types {
            types
                .entry(declared.name.as_str())
                .or_insert((declared.id.as_str(), declared.node_type));
        }
    }

    let mut inheritance = 0usize;
    for (_, extraction) in &extracted {
        for base in &extraction.bases {
            let Some(&(target, target_type)) = types.get(base.base.as_str()) else {
                continue;
            };
            let (source, source_type) = match &base.source {
                BaseSource::Node { id, node_type } => (id.as_str(), *node_type),
                BaseSource::TypeName(name) => match types.get(name.as_str()) {
                    Some(&(id, node_type)) => (id, node_type),
                    None => continue,
                },
            };
            if source == target {
                continue;
            }
            let relationship = if source_type == NodeType::Interface {
                Relationship::Inherits
            } else if target_type == NodeType::Interface {
                Relationship::Implements
            } else {
                base.hint
            };
            builder.add_edge(source, target, relationship);
            inheritance += 1;
        }
    }

    let resolver = ImportResolver::new(profile, index);
    let mut imports = 0usize;
    for (path, extraction) in &extracted {
        let source = ids::module(path);
        for import in &extraction.imports {
            for target in resolver.resolve(path, import) {
                if target == *path {
                    continue;
                }
                builder.add_edge(source.clone(), ids::module(&target), Relationship::Imports);
                imports += 1;
            }
        }
    }

    tracing::debug!(
        profile = profile.id,
        files = output.files_processed,
        inheritance,
        imports,
        "linked"
    );

    output.symbols = extracted
        .into_iter()
        .flat_map(|(_, extraction)| extraction.symbols)
        .collect();
    let (nodes, edges) = builder.into_parts();
    output.nodes = nodes;
    output.edges = edges;
    output.diagnostics.sort();
    output
}

/// Ordered set of profiles an analysis runs.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<&'static LanguageProfile>,
}

impl Default for ProfileRegistry {
    /// Every built-in profile, in registration order.
    fn default() -> Self {
        Self {
            profiles: profiles::all().iter().collect(),
        }
    }
}

impl ProfileRegistry {
    /// Only the profiles reading the given languages, in registration order.
    pub fn for_languages(languages: &[Language]) -> Self {
        Self {
            profiles: profiles::all()
                .iter()
                .filter(|p| languages.contains(&p.language))
                .collect(),
        }
    }

    pub fn profiles(&self) -> &[&'static LanguageProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// One extractor per profile, sharing configuration, cache and token.
    pub fn extractors(
        &self,
        config: &Arc<AnalysisConfig>,
        cache: &Arc<ExtractionCache>,
        cancel: &CancellationToken,
    ) -> Vec<Box<dyn LanguageExtractor>> {
        self.profiles
            .iter()
            .map(|&profile| {
                Box::new(ProfileExtractor::new(
                    profile,
                    Arc::clone(config),
                    Arc::clone(cache),
                    cancel.clone(),
                )) as Box<dyn LanguageExtractor>
            })
            .collect()
    }
}

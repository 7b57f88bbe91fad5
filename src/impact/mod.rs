//! Pull-request blast radius.
//!
//! A pure cross-reference of a changed-file list against a cached analysis:
//! nothing is re-read or re-parsed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::analysis::CachedAnalysis;
use crate::common::normalize_separators;
use crate::graph::{GraphEdge, Relationship};
use crate::ingest::Symbol;

/// Change status of a file in a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    #[default]
    Modified,
    Removed,
    Renamed,
    #[serde(other)]
    Other,
}

impl ChangeStatus {
    /// Serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Removed => "removed",
            ChangeStatus::Renamed => "renamed",
            ChangeStatus::Other => "other",
        }
    }
}

/// One file touched by a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
    pub file_path: String,
    #[serde(default)]
    pub status: ChangeStatus,
    #[serde(default)]
    pub additions: usize,
    #[serde(default)]
    pub deletions: usize,
    /// Name before a rename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_file_path: Option<String>,
}

impl ChangedFile {
    pub fn modified(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            status: ChangeStatus::Modified,
            additions: 0,
            deletions: 0,
            previous_file_path: None,
        }
    }
}

/// Per-file row of the impact report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImpact {
    /// Normalized path
    pub file_path: String,
    pub status: ChangeStatus,
    /// `None` when the path is not in the cached inventory
    pub language: Option<String>,
    pub symbol_count: usize,
    pub additions: usize,
    pub deletions: usize,
}

/// Which end of an affected edge touched the change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeMatch {
    Source,
    Target,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedEdge {
    #[serde(flatten)]
    pub edge: GraphEdge,
    pub matched: EdgeMatch,
}

/// Result of [`analyze_pr_impact`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrImpactResponse {
    pub pr_number: u64,
    pub total_files: usize,
    pub total_additions: usize,
    pub total_deletions: usize,
    /// Distinct languages touched, sorted
    pub languages: Vec<String>,
    pub files: Vec<FileImpact>,
    pub affected_symbols: Vec<Symbol>,
    pub affected_edges: Vec<AffectedEdge>,
    /// Files importing something changed, sorted, changed files excluded
    pub downstream_files: Vec<String>,
}

/// Compute what a pull request touches.
///
/// # Arguments
/// * `pr_number` - Echoed into the response
/// * `changed` - Changed files; `previous_file_path` counts as changed too
/// * `cached` - Analysis of the target repository
///
/// # Returns
/// Affected symbols keep cache order; affected edges keep graph order.
/// Paths missing from the cache produce a row with no language and zero
/// symbols.
pub fn analyze_pr_impact(pr_number: u64, changed: &[ChangedFile], cached: &CachedAnalysis) -> PrImpactResponse {
    let mut changed_paths: HashSet<String> = HashSet::new();
    for file in changed {
        changed_paths.insert(normalize_separators(&file.file_path));
        if let Some(previous) = &file.previous_file_path {
            changed_paths.insert(normalize_separators(previous));
        }
    }

    let language_of: HashMap<&str, &str> = cached
        .files
        .iter()
        .map(|f| (f.relative_path.as_str(), f.language.as_str()))
        .collect();
    let mut symbols_in: HashMap<&str, usize> = HashMap::new();
    for symbol in &cached.symbols {
        *symbols_in.entry(symbol.file_path.as_str()).or_insert(0) += 1;
    }

    let mut languages = BTreeSet::new();
    let files: Vec<FileImpact> = changed
        .iter()
        .map(|file| {
            let path = normalize_separators(&file.file_path);
            let language = language_of.get(path.as_str()).map(|l| l.to_string());
            if let Some(language) = &language {
                languages.insert(language.clone());
            }
            FileImpact {
                symbol_count: symbols_in.get(path.as_str()).copied().unwrap_or(0),
                file_path: path,
                status: file.status,
                language,
                additions: file.additions,
                deletions: file.deletions,
            }
        })
        .collect();

    let affected_symbols: Vec<Symbol> = cached
        .symbols
        .iter()
        .filter(|s| changed_paths.contains(&s.file_path))
        .cloned()
        .collect();

    let mut changed_ids: HashSet<&str> = changed_paths.iter().map(String::as_str).collect();
    for node in &cached.graph.nodes {
        if let Some(path) = &node.file_path {
            if changed_paths.contains(path) {
                changed_ids.insert(node.id.as_str());
            }
        }
    }

    let node_files: HashMap<&str, &str> = cached
        .graph
        .nodes
        .iter()
        .filter_map(|n| n.file_path.as_deref().map(|p| (n.id.as_str(), p)))
        .collect();

    let mut affected_edges = Vec::new();
    let mut downstream = BTreeSet::new();
    for edge in &cached.graph.edges {
        let source = changed_ids.contains(edge.source.as_str());
        let target = changed_ids.contains(edge.target.as_str());
        let matched = match (source, target) {
            (true, true) => EdgeMatch::Both,
            (true, false) => EdgeMatch::Source,
            (false, true) => EdgeMatch::Target,
            (false, false) => continue,
        };
        affected_edges.push(AffectedEdge {
            edge: edge.clone(),
            matched,
        });
        if target && edge.relationship == Relationship::Imports {
            let file = node_files
                .get(edge.source.as_str())
                .copied()
                .unwrap_or(edge.source.as_str());
            if !changed_paths.contains(file) {
                downstream.insert(file.to_string());
            }
        }
    }

    let response = PrImpactResponse {
        pr_number,
        total_files: changed.len(),
        total_additions: changed.iter().map(|f| f.additions).sum(),
        total_deletions: changed.iter().map(|f| f.deletions).sum(),
        languages: languages.into_iter().collect(),
        files,
        affected_symbols,
        affected_edges,
        downstream_files: downstream.into_iter().collect(),
    };
    tracing::info!(
        pr_number,
        files = response.total_files,
        symbols = response.affected_symbols.len(),
        edges = response.affected_edges.len(),
        downstream = response.downstream_files.len(),
        "pr impact computed"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyGraph, GraphNode, NodeType};
    use crate::ingest::{Language, SymbolKind};
    use crate::scan::FileInfo;

    fn info(path: &str, language: Language) -> FileInfo {
        FileInfo {
            relative_path: path.to_string(),
            language,
            size_bytes: 10,
            line_count: 1,
        }
    }

    #[test]
    fn test_downstream_importers() {
        let cached = CachedAnalysis {
            files: vec![info("a.go", Language::Go), info("b.go", Language::Go)],
            symbols: vec![],
            graph: DependencyGraph {
                nodes: vec![],
                edges: vec![GraphEdge::new("b.go", "a.go", Relationship::Imports)],
            },
        };
        let response = analyze_pr_impact(7, &[ChangedFile::modified("a.go")], &cached);
        assert_eq!(response.downstream_files, vec!["b.go"]);
        assert_eq!(response.affected_edges.len(), 1);
        assert_eq!(response.affected_edges[0].matched, EdgeMatch::Target);
        assert_eq!(response.languages, vec!["go"]);
        assert_eq!(response.pr_number, 7);
    }

    #[test]
    fn test_rename_touches_both_paths() {
        let cached = CachedAnalysis {
            files: vec![info("old/name.py", Language::Python)],
            symbols: vec![
                Symbol::new("Old", SymbolKind::Class, "old/name.py", 1),
                Symbol::new("New", SymbolKind::Class, "new/name.py", 1),
                Symbol::new("Other", SymbolKind::Class, "other.py", 1),
            ],
            graph: DependencyGraph {
                nodes: vec![GraphNode::new("class:old/name.Old", "Old", NodeType::Class)
                    .with_file("old/name.py")],
                edges: vec![
                    GraphEdge::new("module:other.py", "class:old/name.Old", Relationship::Inherits),
                    GraphEdge::new("folder:new", "new/name.py", Relationship::Contains),
                ],
            },
        };
        let changed = vec![ChangedFile {
            file_path: "new\\name.py".to_string(),
            status: ChangeStatus::Renamed,
            additions: 3,
            deletions: 1,
            previous_file_path: Some("old/name.py".to_string()),
        }];
        let response = analyze_pr_impact(1, &changed, &cached);
        let names: Vec<&str> = response.affected_symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Old", "New"]);
        assert_eq!(response.affected_edges.len(), 2);
        assert_eq!(response.files[0].file_path, "new/name.py");
        assert_eq!(response.files[0].language, None);
        assert_eq!(response.files[0].symbol_count, 1);
        assert_eq!(response.total_additions, 3);
        // Inherits is not an import
        assert!(response.downstream_files.is_empty());
    }

    #[test]
    fn test_downstream_maps_nodes_to_files_and_excludes_changed() {
        let cached = CachedAnalysis {
            files: vec![],
            symbols: vec![],
            graph: DependencyGraph {
                nodes: vec![
                    GraphNode::new("module:a.py", "a.py", NodeType::Module).with_file("a.py"),
                    GraphNode::new("module:b.py", "b.py", NodeType::Module).with_file("b.py"),
                    GraphNode::new("module:c.py", "c.py", NodeType::Module).with_file("c.py"),
                ],
                edges: vec![
                    GraphEdge::new("module:b.py", "module:a.py", Relationship::Imports),
                    GraphEdge::new("module:b.py", "module:a.py", Relationship::Imports),
                    GraphEdge::new("module:c.py", "module:a.py", Relationship::Imports),
                    GraphEdge::new("module:a.py", "module:a.py", Relationship::Contains),
                ],
            },
        };
        let changed = vec![ChangedFile::modified("a.py"), ChangedFile::modified("c.py")];
        let response = analyze_pr_impact(2, &changed, &cached);
        assert_eq!(response.downstream_files, vec!["b.py"]);
        assert_eq!(response.affected_edges.len(), 4);
        assert_eq!(response.affected_edges[2].matched, EdgeMatch::Both);
    }

    #[test]
    fn test_status_parsing() {
        let file: ChangedFile =
            serde_json::from_str(r#"{"filePath":"x.rs","status":"renamed","previousFilePath":"y.rs"}"#)
                .unwrap();
        assert_eq!(file.status, ChangeStatus::Renamed);
        let other: ChangedFile =
            serde_json::from_str(r#"{"filePath":"x.rs","status":"copied"}"#).unwrap();
        assert_eq!(other.status, ChangeStatus::Other);
        let bare: ChangedFile = serde_json::from_str(r#"{"filePath":"x.rs"}"#).unwrap();
        assert_eq!(bare.status, ChangeStatus::Modified);
    }
}

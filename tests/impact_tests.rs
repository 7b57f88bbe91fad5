//! PR impact tests against hand-built and analyzed caches

use cartograph::graph::{GraphEdge, GraphNode};
use cartograph::impact::EdgeMatch;
use cartograph::{
    analyze_full, analyze_pr_impact, AnalysisStore, CachedAnalysis, ChangeStatus, ChangedFile,
    DependencyGraph, FileInfo, Language, NodeType, Relationship, Symbol, SymbolKind,
};
use std::fs;
use tempfile::TempDir;

fn go_file(path: &str) -> FileInfo {
    FileInfo {
        relative_path: path.to_string(),
        language: Language::Go,
        size_bytes: 40,
        line_count: 3,
    }
}

fn changed(path: &str, previous: Option<&str>, status: ChangeStatus) -> ChangedFile {
    ChangedFile {
        file_path: path.to_string(),
        status,
        additions: 3,
        deletions: 1,
        previous_file_path: previous.map(str::to_string),
    }
}

#[test]
fn test_downstream_importer_example() {
    let cached = CachedAnalysis {
        files: vec![go_file("a.go"), go_file("b.go")],
        symbols: vec![],
        graph: DependencyGraph {
            nodes: vec![],
            edges: vec![GraphEdge::new("b.go", "a.go", Relationship::Imports)],
        },
    };

    let response = analyze_pr_impact(7, &[ChangedFile::modified("a.go")], &cached);
    assert_eq!(response.pr_number, 7);
    assert_eq!(response.downstream_files, vec!["b.go"]);
    assert_eq!(response.affected_edges.len(), 1);
    assert_eq!(response.affected_edges[0].matched, EdgeMatch::Target);
    assert_eq!(response.languages, vec!["go"]);
}

#[test]
fn test_rename_touches_both_paths() {
    let cached = CachedAnalysis {
        files: vec![],
        symbols: vec![
            Symbol::new("old_helper", SymbolKind::Function, "old/name.py", 1),
            Symbol::new("new_helper", SymbolKind::Function, "new/name.py", 1),
            Symbol::new("untouched", SymbolKind::Function, "other.py", 1),
        ],
        graph: DependencyGraph {
            nodes: vec![
                GraphNode::new("module:old/name.py", "name", NodeType::Module).with_file("old/name.py"),
                GraphNode::new("module:new/name.py", "name", NodeType::Module).with_file("new/name.py"),
                GraphNode::new("module:other.py", "other", NodeType::Module).with_file("other.py"),
            ],
            edges: vec![
                GraphEdge::new("module:other.py", "module:old/name.py", Relationship::Imports),
                GraphEdge::new("module:new/name.py", "module:other.py", Relationship::Imports),
            ],
        },
    };

    let response = analyze_pr_impact(
        1,
        &[changed("new/name.py", Some("old/name.py"), ChangeStatus::Renamed)],
        &cached,
    );

    let names: Vec<&str> = response.affected_symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["old_helper", "new_helper"]);
    assert_eq!(response.affected_edges.len(), 2);
    assert_eq!(response.affected_edges[0].matched, EdgeMatch::Target);
    assert_eq!(response.affected_edges[1].matched, EdgeMatch::Source);
    // module ids are mapped back to file paths
    assert_eq!(response.downstream_files, vec!["other.py"]);
    assert_eq!(response.files.len(), 1);
    assert_eq!(response.files[0].status, ChangeStatus::Renamed);
}

#[test]
fn test_unknown_paths_are_not_errors() {
    let response = analyze_pr_impact(
        2,
        &[changed("docs/readme.md", None, ChangeStatus::Added)],
        &CachedAnalysis::default(),
    );
    assert_eq!(response.total_files, 1);
    assert_eq!(response.total_additions, 3);
    assert_eq!(response.total_deletions, 1);
    assert_eq!(response.files[0].language, None);
    assert_eq!(response.files[0].symbol_count, 0);
    assert!(response.affected_symbols.is_empty());
    assert!(response.downstream_files.is_empty());
    assert!(response.languages.is_empty());
}

#[test]
fn test_changed_files_json_shape() {
    let input = r#"[
        {"filePath": "src\\lib.rs", "status": "modified", "additions": 4, "deletions": 2},
        {"filePath": "new.rs", "status": "renamed", "previousFilePath": "old.rs"},
        {"filePath": "x.rs", "status": "copied"}
    ]"#;
    let files: Vec<ChangedFile> = serde_json::from_str(input).unwrap();
    assert_eq!(files[0].additions, 4);
    assert_eq!(files[1].previous_file_path.as_deref(), Some("old.rs"));
    assert_eq!(files[1].additions, 0);
    assert_eq!(files[2].status, ChangeStatus::Other);

    let response = analyze_pr_impact(3, &files, &CachedAnalysis::default());
    assert_eq!(response.files[0].file_path, "src/lib.rs");
}

#[test]
fn test_impact_over_analyzed_repository() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(root.join("app/models.py"), "class User:\n    def save(self):\n        pass\n").unwrap();
    fs::write(
        root.join("app/views.py"),
        "from app.models import User\n\ndef index():\n    return User()\n",
    )
    .unwrap();

    let full = analyze_full(root, None).unwrap();
    let store = AnalysisStore::new();
    store.insert("repo", full.into_cached());

    let response = store
        .analyze_pr_for("repo", 12, &[ChangedFile::modified("app/models.py")])
        .unwrap();
    assert_eq!(response.downstream_files, vec!["app/views.py"]);
    assert!(response
        .affected_symbols
        .iter()
        .any(|s| s.name == "User" && s.kind == SymbolKind::Class));
    assert!(response.affected_symbols.iter().all(|s| s.file_path == "app/models.py"));
    assert_eq!(response.files[0].language.as_deref(), Some("python"));
    assert!(response
        .affected_edges
        .iter()
        .any(|e| e.edge.relationship == Relationship::Contains && e.matched == EdgeMatch::Target));
}

#[test]
fn test_cached_analysis_survives_disk() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("repo");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("main.go"), "package main\n\nfunc main() {}\n").unwrap();

    let cached = analyze_full(&root, None).unwrap().into_cached();
    let path = temp_dir.path().join("analysis.json");
    cached.save(&path).unwrap();
    assert_eq!(CachedAnalysis::load(&path).unwrap(), cached);
}

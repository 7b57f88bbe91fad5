//! Repository overview derived from the scanned inventory.
//!
//! Pure function of data already in hand: frameworks and entry points are
//! detected from file names only, never from file contents.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::common::{extension, file_name};
use crate::ingest::Symbol;
use crate::scan::FileInfo;

use super::model::DependencyGraph;

/// Per-language share of the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStat {
    pub language: String,
    pub files: usize,
    pub lines: usize,
    pub bytes: u64,
    /// Share of all lines (of all files when no line was counted), 0–100
    pub percentage: f64,
}

/// Summary of one analyzed repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOverview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    pub total_files: usize,
    pub total_lines: usize,
    pub total_bytes: u64,
    /// Largest share first
    pub languages: Vec<LanguageStat>,
    /// Sorted, deduplicated
    pub frameworks: Vec<String>,
    /// Relative paths, sorted
    pub entry_points: Vec<String>,
    pub symbol_counts: BTreeMap<String, usize>,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Marker file names (exact) → framework.
const MARKER_FILES: &[(&str, &str)] = &[
    ("package.json", "Node.js"),
    ("angular.json", "Angular"),
    ("Cargo.toml", "Cargo"),
    ("go.mod", "Go Modules"),
    ("pom.xml", "Maven"),
    ("build.gradle", "Gradle"),
    ("build.gradle.kts", "Gradle"),
    ("settings.gradle", "Gradle"),
    ("requirements.txt", "pip"),
    ("pyproject.toml", "pip"),
    ("Pipfile", "pip"),
    ("manage.py", "Django"),
    ("Gemfile", "Bundler"),
    ("composer.json", "Composer"),
    ("pubspec.yaml", "Flutter/Dart"),
    ("Package.swift", "SwiftPM"),
    ("Dockerfile", "Docker"),
    ("docker-compose.yml", "Docker"),
    ("docker-compose.yaml", "Docker"),
    ("build.sbt", "sbt"),
    ("CMakeLists.txt", "CMake"),
];

/// Marker file name prefixes → framework (`next.config.js`, `vite.config.ts`).
const MARKER_PREFIXES: &[(&str, &str)] = &[
    ("next.config.", "Next.js"),
    ("nuxt.config.", "Nuxt"),
    ("vite.config.", "Vite"),
    ("svelte.config.", "Svelte"),
    ("tailwind.config.", "Tailwind CSS"),
];

/// Extensions → framework.
const MARKER_EXTENSIONS: &[(&str, &str)] = &[
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("jsx", "React"),
    ("tsx", "React"),
    ("csproj", ".NET"),
    ("sln", ".NET"),
    ("fsproj", ".NET"),
];

/// File names that are entry points wherever they appear.
const ENTRY_FILES: &[&str] = &[
    "Program.cs",
    "index.js",
    "index.ts",
    "index.jsx",
    "index.tsx",
    "app.py",
    "__main__.py",
    "manage.py",
    "wsgi.py",
    "asgi.py",
    "lib.rs",
    "main.rs",
    "Main.java",
    "Application.java",
    "App.kt",
    "Main.kt",
    "Application.kt",
    "App.swift",
    "AppDelegate.swift",
    "config.ru",
    "index.php",
    "main.dart",
];

/// File stems that are entry points with any code extension (`main.go`).
const ENTRY_STEMS: &[&str] = &["main", "server", "app"];

/// Derive the overview.
///
/// # Arguments
/// * `repo_url` - Source URL, if the repository came from a remote
/// * `files` - Scanned inventory
/// * `symbols` - Extracted symbols (for per-kind counts)
/// * `graph` - Assembled graph (for node/edge counts)
pub fn overview(
    repo_url: Option<&str>,
    files: &[FileInfo],
    symbols: &[Symbol],
    graph: &DependencyGraph,
) -> RepositoryOverview {
    let total_lines: usize = files.iter().map(|f| f.line_count).sum();
    let total_bytes: u64 = files.iter().map(|f| f.size_bytes).sum();

    let mut by_language: BTreeMap<&str, (usize, usize, u64)> = BTreeMap::new();
    for file in files {
        let entry = by_language.entry(file.language.as_str()).or_default();
        entry.0 += 1;
        entry.1 += file.line_count;
        entry.2 += file.size_bytes;
    }
    let mut languages: Vec<LanguageStat> = by_language
        .into_iter()
        .map(|(language, (count, lines, bytes))| {
            let share = if total_lines > 0 {
                lines as f64 / total_lines as f64
            } else {
                count as f64 / files.len() as f64
            };
            LanguageStat {
                language: language.to_string(),
                files: count,
                lines,
                bytes,
                percentage: (share * 10_000.0).round() / 100.0,
            }
        })
        .collect();
    languages.sort_by(|a, b| {
        b.lines
            .cmp(&a.lines)
            .then(b.files.cmp(&a.files))
            .then_with(|| a.language.cmp(&b.language))
    });

    let mut symbol_counts = BTreeMap::new();
    for symbol in symbols {
        *symbol_counts.entry(symbol.kind.as_str().to_string()).or_insert(0) += 1;
    }

    RepositoryOverview {
        repo_url: repo_url.map(str::to_string),
        total_files: files.len(),
        total_lines,
        total_bytes,
        languages,
        frameworks: detect_frameworks(files),
        entry_points: detect_entry_points(files),
        symbol_counts,
        node_count: graph.nodes.len(),
        edge_count: graph.edges.len(),
    }
}

/// Frameworks and toolchains signalled by marker files.
pub fn detect_frameworks(files: &[FileInfo]) -> Vec<String> {
    let mut found = BTreeSet::new();
    for file in files {
        let path = file.relative_path.as_str();
        let name = file_name(path);
        for (marker, framework) in MARKER_FILES {
            if name == *marker {
                found.insert(*framework);
            }
        }
        for (prefix, framework) in MARKER_PREFIXES {
            if name.starts_with(prefix) {
                found.insert(*framework);
            }
        }
        if let Some(ext) = extension(path) {
            for (marker, framework) in MARKER_EXTENSIONS {
                if ext == *marker {
                    found.insert(*framework);
                }
            }
        }
        if path == "config/routes.rb" || path.ends_with("/config/routes.rb") {
            found.insert("Rails");
        }
    }
    found.into_iter().map(str::to_string).collect()
}

/// Likely program entry points, by file name.
pub fn detect_entry_points(files: &[FileInfo]) -> Vec<String> {
    let mut found: Vec<String> = files
        .iter()
        .filter(|f| f.language.is_code() || file_name(&f.relative_path) == "config.ru")
        .filter(|f| is_entry_point(&f.relative_path))
        .map(|f| f.relative_path.clone())
        .collect();
    found.sort();
    found
}

fn is_entry_point(path: &str) -> bool {
    let name = file_name(path);
    if ENTRY_FILES.contains(&name) {
        return true;
    }
    let stem = match name.find('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => return false,
    };
    ENTRY_STEMS.contains(&stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{Language, SymbolKind};

    fn file(path: &str, language: Language, lines: usize) -> FileInfo {
        FileInfo {
            relative_path: path.to_string(),
            language,
            size_bytes: lines as u64 * 10,
            line_count: lines,
        }
    }

    #[test]
    fn test_language_breakdown() {
        let files = vec![
            file("src/a.ts", Language::TypeScript, 30),
            file("src/b.ts", Language::TypeScript, 45),
            file("tools/x.py", Language::Python, 25),
        ];
        let result = overview(None, &files, &[], &DependencyGraph::default());
        assert_eq!(result.total_files, 3);
        assert_eq!(result.total_lines, 100);
        assert_eq!(result.languages[0].language, "typescript");
        assert_eq!(result.languages[0].files, 2);
        assert_eq!(result.languages[0].percentage, 75.0);
        assert_eq!(result.languages[1].percentage, 25.0);
    }

    #[test]
    fn test_frameworks_from_marker_files() {
        let files = vec![
            file("package.json", Language::Build, 10),
            file("next.config.js", Language::JavaScript, 5),
            file("web/App.tsx", Language::TypeScript, 5),
            file("api/config/routes.rb", Language::Ruby, 5),
            file("Dockerfile", Language::Build, 3),
            file("svc/Service.csproj", Language::Build, 3),
        ];
        assert_eq!(
            detect_frameworks(&files),
            vec![".NET", "Docker", "Next.js", "Node.js", "Rails", "React"]
        );
    }

    #[test]
    fn test_entry_points() {
        let files = vec![
            file("cmd/server/main.go", Language::Go, 10),
            file("src/Program.cs", Language::CSharp, 10),
            file("src/util.cs", Language::CSharp, 10),
            file("web/index.ts", Language::TypeScript, 10),
            file("main.md", Language::Markdown, 10),
            file("pkg/__main__.py", Language::Python, 10),
        ];
        assert_eq!(
            detect_entry_points(&files),
            vec!["cmd/server/main.go", "pkg/__main__.py", "src/Program.cs", "web/index.ts"]
        );
    }

    #[test]
    fn test_symbol_counts_and_url() {
        let symbols = vec![
            Symbol::new("A", SymbolKind::Class, "a.py", 1),
            Symbol::new("f", SymbolKind::Function, "a.py", 3),
            Symbol::new("B", SymbolKind::Class, "b.py", 1),
        ];
        let result = overview(Some("https://example.com/r.git"), &[], &symbols, &DependencyGraph::default());
        assert_eq!(result.symbol_counts["Class"], 2);
        assert_eq!(result.symbol_counts["Function"], 1);
        assert_eq!(result.repo_url.as_deref(), Some("https://example.com/r.git"));
        assert!(result.languages.is_empty());
    }
}

//! Language detection from file extension or well-known filename.
//!
//! Build manifests (`Cargo.toml`, `package.json`, `Dockerfile`, ...) map to
//! the pseudo-language [`Language::Build`]: they are inventoried and line
//! counted but carry no code-line semantics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Language of a scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    CSharp,
    Java,
    Kotlin,
    Scala,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Rust,
    C,
    Cpp,
    Ruby,
    Php,
    Swift,
    Dart,
    Html,
    Css,
    Vue,
    Json,
    Yaml,
    Xml,
    Markdown,
    Shell,
    Sql,
    Toml,
    /// Build manifests and tooling files
    Build,
}

/// Filenames that always map to [`Language::Build`], checked before extensions.
const BUILD_FILENAMES: &[&str] = &[
    "Dockerfile",
    "Makefile",
    "makefile",
    "GNUmakefile",
    "CMakeLists.txt",
    "package.json",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "requirements.txt",
    "pyproject.toml",
    "Pipfile",
    "Gemfile",
    "Rakefile",
    "composer.json",
    "pubspec.yaml",
    "build.sbt",
    "docker-compose.yml",
    "docker-compose.yaml",
];

/// Extensions that always map to [`Language::Build`].
const BUILD_EXTENSIONS: &[&str] = &["csproj", "sln", "fsproj", "vbproj", "gradle"];

impl Language {
    /// Stable lowercase identifier used in file inventories and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Dart => "dart",
            Language::Html => "html",
            Language::Css => "css",
            Language::Vue => "vue",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Xml => "xml",
            Language::Markdown => "markdown",
            Language::Shell => "shell",
            Language::Sql => "sql",
            Language::Toml => "toml",
            Language::Build => "build",
        }
    }

    /// Map a file extension (without the dot, any case) to a language.
    pub fn from_extension(ext: &str) -> Option<Language> {
        let ext = ext.to_ascii_lowercase();
        if BUILD_EXTENSIONS.contains(&ext.as_str()) {
            return Some(Language::Build);
        }
        let language = match ext.as_str() {
            "cs" => Language::CSharp,
            "java" => Language::Java,
            "kt" | "kts" => Language::Kotlin,
            "scala" | "sc" => Language::Scala,
            "py" | "pyi" | "pyw" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "h++" | "ipp" => Language::Cpp,
            "rb" | "rake" | "gemspec" => Language::Ruby,
            "php" | "phtml" => Language::Php,
            "swift" => Language::Swift,
            "dart" => Language::Dart,
            "html" | "htm" => Language::Html,
            "css" | "scss" | "sass" | "less" => Language::Css,
            "vue" | "svelte" => Language::Vue,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "xml" | "xaml" => Language::Xml,
            "md" | "markdown" => Language::Markdown,
            "sh" | "bash" | "zsh" | "ps1" => Language::Shell,
            "sql" => Language::Sql,
            "toml" => Language::Toml,
            _ => return None,
        };
        Some(language)
    }

    /// Whether files of this language hold code an extraction profile reads.
    pub fn is_code(&self) -> bool {
        !matches!(
            self,
            Language::Html
                | Language::Css
                | Language::Json
                | Language::Yaml
                | Language::Xml
                | Language::Markdown
                | Language::Toml
                | Language::Build
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the language of a path from its filename or extension.
///
/// # Returns
/// `None` when the file is not recognized; such files are not inventoried.
pub fn detect_language(path: &Path) -> Option<Language> {
    let file_name = path.file_name()?.to_str()?;
    if BUILD_FILENAMES.contains(&file_name) || file_name.starts_with("Dockerfile.") {
        return Some(Language::Build);
    }
    let ext = path.extension()?.to_str()?;
    Language::from_extension(ext)
}

//! Symbol extraction from raw source text.
//!
//! One generic line scanner ([`engine`]) runs per-language [`LanguageProfile`]
//! tables ([`profiles`]) over every candidate file of a repository. The
//! [`extractor`] module wraps a profile as a [`LanguageExtractor`] and links
//! imports and base types across files; [`cache`] memoizes the per-repository
//! result so symbols and dependencies come from a single pass.

pub mod cache;
pub mod detect;
pub mod engine;
pub mod extractor;
pub mod imports;
pub mod profile;
pub mod profiles;

pub use cache::{CacheStats, ExtractionCache};
pub use detect::{detect_language, Language};
pub use extractor::{LanguageExtractor, ProfileExtractor, ProfileOutput, ProfileRegistry};
pub use profile::LanguageProfile;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of symbol extracted from source code
///
/// Language-agnostic symbol kinds that map across every supported language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    /// Class-like type: class, struct, enum, record, object, union
    Class,
    /// Interface-like type: interface, trait, protocol, mixin
    Interface,
    /// Function declared inside a type
    Method,
    /// Free function
    Function,
    /// Field, property or class-level constant inside a type
    Property,
    /// Top-level variable or constant
    Variable,
    /// Namespace or package declaration
    Namespace,
    /// Module declaration (Ruby `module`, Rust inline `mod`)
    Module,
    /// Import / include / use / require statement
    Import,
}

impl SymbolKind {
    /// Every kind, in declaration order.
    pub const ALL: [SymbolKind; 9] = [
        SymbolKind::Class,
        SymbolKind::Interface,
        SymbolKind::Method,
        SymbolKind::Function,
        SymbolKind::Property,
        SymbolKind::Variable,
        SymbolKind::Namespace,
        SymbolKind::Module,
        SymbolKind::Import,
    ];

    /// Display name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "Class",
            SymbolKind::Interface => "Interface",
            SymbolKind::Method => "Method",
            SymbolKind::Function => "Function",
            SymbolKind::Property => "Property",
            SymbolKind::Variable => "Variable",
            SymbolKind::Namespace => "Namespace",
            SymbolKind::Module => "Module",
            SymbolKind::Import => "Import",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named code construct found in one file.
///
/// Symbols are owned by the extraction result of their file and are never
/// merged or deduplicated across files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Repository-relative path with `/` separators
    pub file_path: String,
    /// 1-indexed line of the declaration
    pub line: usize,
    /// Enclosing type or namespace, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_symbol: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, file_path: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            file_path: file_path.into(),
            line,
            parent_symbol: None,
        }
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent_symbol = parent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_json_shape() {
        let symbol = Symbol::new("save", SymbolKind::Method, "src/user.py", 12)
            .with_parent(Some("User".to_string()));
        let json = serde_json::to_value(&symbol).unwrap();
        assert_eq!(json["filePath"], "src/user.py");
        assert_eq!(json["kind"], "Method");
        assert_eq!(json["parentSymbol"], "User");

        let top = Symbol::new("main", SymbolKind::Function, "main.go", 3);
        let json = serde_json::to_value(&top).unwrap();
        assert!(json.get("parentSymbol").is_none());
    }

    #[test]
    fn test_symbol_kind_display_matches_serde() {
        for kind in SymbolKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}

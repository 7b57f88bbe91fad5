//! Common path and formatting helpers shared by the scanner, the extraction
//! engine, the impact analyzer and the command modules.
//!
//! All repository-relative paths in cartograph use `/` separators, whatever
//! the host platform. These helpers are the single place that conversion
//! happens.

use std::path::Path;

use crate::ingest::SymbolKind;

/// Replace every `\` with `/`.
///
/// # Example
/// ```rust
/// use cartograph::common::normalize_separators;
/// assert_eq!(normalize_separators("src\\app\\main.cs"), "src/app/main.cs");
/// ```
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Path of `path` relative to `root`, with `/` separators.
///
/// Falls back to the full path when `path` is not under `root`.
pub fn relative_path_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_separators(&rel.to_string_lossy())
}

/// Directory part of a relative path, `""` for files at the root.
pub fn parent_dir(rel_path: &str) -> &str {
    match rel_path.rfind('/') {
        Some(idx) => &rel_path[..idx],
        None => "",
    }
}

/// Final segment of a relative path.
pub fn file_name(rel_path: &str) -> &str {
    match rel_path.rfind('/') {
        Some(idx) => &rel_path[idx + 1..],
        None => rel_path,
    }
}

/// Relative path with the final extension removed.
///
/// Used as the logical module path in type/function node ids:
/// `src/models/user.py` → `src/models/user`.
pub fn strip_extension(rel_path: &str) -> &str {
    let name_start = rel_path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match rel_path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &rel_path[..name_start + dot],
        _ => rel_path,
    }
}

/// Lowercase extension of a relative path, without the dot.
pub fn extension(rel_path: &str) -> Option<String> {
    let name = file_name(rel_path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => Some(name[dot + 1..].to_ascii_lowercase()),
        _ => None,
    }
}

/// Join a relative reference onto a base directory, folding `.` and `..`.
///
/// # Returns
/// `None` when the reference climbs above the repository root.
///
/// # Example
/// ```rust
/// use cartograph::common::join_relative;
/// assert_eq!(join_relative("src/a", "../b/c").as_deref(), Some("src/b/c"));
/// assert_eq!(join_relative("", "../x"), None);
/// ```
pub fn join_relative(base_dir: &str, reference: &str) -> Option<String> {
    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Format a SymbolKind for display
pub fn format_symbol_kind(kind: &SymbolKind) -> &'static str {
    kind.as_str()
}

/// Parse a string into a SymbolKind (case-insensitive)
///
/// # Supported values (case-insensitive)
/// - "class", "struct", "enum", "record" → Class
/// - "interface", "trait", "protocol" → Interface
/// - "method" → Method
/// - "function", "func", "fn", "def" → Function
/// - "property", "field", "attribute" → Property
/// - "variable", "var", "const", "constant" → Variable
/// - "namespace", "ns", "package" → Namespace
/// - "module", "mod" → Module
/// - "import", "include", "use", "require" → Import
pub fn parse_symbol_kind(s: &str) -> Option<SymbolKind> {
    match s.trim().to_lowercase().as_str() {
        "class" | "struct" | "enum" | "record" => Some(SymbolKind::Class),
        "interface" | "trait" | "protocol" => Some(SymbolKind::Interface),
        "method" => Some(SymbolKind::Method),
        "function" | "func" | "fn" | "def" => Some(SymbolKind::Function),
        "property" | "field" | "attribute" => Some(SymbolKind::Property),
        "variable" | "var" | "const" | "constant" => Some(SymbolKind::Variable),
        "namespace" | "ns" | "package" => Some(SymbolKind::Namespace),
        "module" | "mod" => Some(SymbolKind::Module),
        "import" | "include" | "use" | "require" => Some(SymbolKind::Import),
        _ => None,
    }
}

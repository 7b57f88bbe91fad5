//! Scan diagnostics for structured skip reasons and error reporting.
//!
//! Every per-file problem met while walking or extracting a repository is
//! recorded here instead of failing the operation:
//! - Skips carry a [`SkipReason`] (ignored directory, oversized, unreadable, ...)
//! - Errors carry the [`DiagnosticStage`] and, for extraction, the profile id
//!
//! Diagnostics sort deterministically via `sort_key()` so reports are stable
//! across runs regardless of thread scheduling.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Reason why a file was skipped during scanning or extraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Build output / dependency directory (`node_modules`, `target`, ...)
    IgnoredInternal,
    /// Path segment starting with `.`
    Hidden,
    /// Matched by gitignore-style rules (.gitignore, .ignore)
    IgnoredByGitignore,
    /// Rejected by an include/exclude glob
    ExcludedByGlob,
    /// No language mapping for the extension or filename
    UnsupportedLanguage,
    /// Above the extraction size ceiling
    Oversized,
    /// File could not be read
    Unreadable,
    /// Directory could not be listed
    AccessDenied,
}

impl SkipReason {
    /// Stable sort key for deterministic ordering.
    ///
    /// Lower values = higher priority in reporting.
    pub fn sort_key(&self) -> u8 {
        match self {
            SkipReason::IgnoredInternal => 0,
            SkipReason::Hidden => 1,
            SkipReason::IgnoredByGitignore => 2,
            SkipReason::ExcludedByGlob => 3,
            SkipReason::UnsupportedLanguage => 4,
            SkipReason::Oversized => 5,
            SkipReason::Unreadable => 6,
            SkipReason::AccessDenied => 7,
        }
    }

    /// Human-readable description for stderr output.
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::IgnoredInternal => "internal ignore rule",
            SkipReason::Hidden => "hidden path",
            SkipReason::IgnoredByGitignore => "matched by gitignore",
            SkipReason::ExcludedByGlob => "excluded by pattern",
            SkipReason::UnsupportedLanguage => "language not supported",
            SkipReason::Oversized => "above size ceiling",
            SkipReason::Unreadable => "file not readable",
            SkipReason::AccessDenied => "access denied",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for SkipReason {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SkipReason {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Stage in the analysis pipeline where an error occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DiagnosticStage {
    /// Walking the directory tree
    Walk,
    /// Reading file contents
    Read,
    /// Running an extraction profile over one file
    Extract,
    /// Other error not categorized above
    Other,
}

impl DiagnosticStage {
    /// Stable sort key for deterministic ordering.
    pub fn sort_key(&self) -> u8 {
        match self {
            DiagnosticStage::Walk => 0,
            DiagnosticStage::Read => 1,
            DiagnosticStage::Extract => 2,
            DiagnosticStage::Other => 3,
        }
    }

    /// Human-readable description for stderr output.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticStage::Walk => "walking directory",
            DiagnosticStage::Read => "reading file",
            DiagnosticStage::Extract => "extracting symbols",
            DiagnosticStage::Other => "processing",
        }
    }
}

impl fmt::Display for DiagnosticStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for DiagnosticStage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DiagnosticStage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// A diagnostic event from the scan/extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanDiagnostic {
    /// File or directory was skipped
    Skipped {
        /// Path relative to root
        path: String,
        reason: SkipReason,
    },
    /// Error occurred while processing a file; the file contributes nothing
    /// for the failing stage
    Error {
        /// Path relative to root
        path: String,
        stage: DiagnosticStage,
        /// Extraction profile that failed, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        profile: Option<String>,
        message: String,
    },
}

impl ScanDiagnostic {
    /// Get the file path for this diagnostic.
    pub fn path(&self) -> &str {
        match self {
            ScanDiagnostic::Skipped { path, .. } => path,
            ScanDiagnostic::Error { path, .. } => path,
        }
    }

    /// Stable sort key for deterministic ordering.
    ///
    /// Primary: path string (lexicographic)
    /// Secondary: variant type (Error before Skipped)
    /// Tertiary: stage/reason sort key
    pub fn sort_key(&self) -> (&str, u8, u8, &str) {
        match self {
            ScanDiagnostic::Error {
                path,
                stage,
                profile,
                ..
            } => (path, 0, stage.sort_key(), profile.as_deref().unwrap_or("")),
            ScanDiagnostic::Skipped { path, reason } => (path, 1, reason.sort_key(), ""),
        }
    }

    /// Create a Skipped diagnostic.
    pub fn skipped(path: impl Into<String>, reason: SkipReason) -> Self {
        ScanDiagnostic::Skipped {
            path: path.into(),
            reason,
        }
    }

    /// Create an Error diagnostic.
    pub fn error(path: impl Into<String>, stage: DiagnosticStage, message: impl Into<String>) -> Self {
        ScanDiagnostic::Error {
            path: path.into(),
            stage,
            profile: None,
            message: message.into(),
        }
    }

    /// Create an Error diagnostic attributed to one extraction profile.
    pub fn profile_error(
        path: impl Into<String>,
        profile: &str,
        stage: DiagnosticStage,
        message: impl Into<String>,
    ) -> Self {
        ScanDiagnostic::Error {
            path: path.into(),
            stage,
            profile: Some(profile.to_string()),
            message: message.into(),
        }
    }

    /// Whether this diagnostic records a failure rather than a skip.
    pub fn is_error(&self) -> bool {
        matches!(self, ScanDiagnostic::Error { .. })
    }

    /// Format for human-readable stderr output.
    ///
    /// Examples:
    /// - "SKIP node_modules: internal ignore rule"
    /// - "ERROR src/bad.py [python]: extracting symbols: invalid UTF-8"
    pub fn format_stderr(&self) -> String {
        match self {
            ScanDiagnostic::Skipped { path, reason } => {
                format!("SKIP {}: {}", path, reason)
            }
            ScanDiagnostic::Error {
                path,
                stage,
                profile: Some(profile),
                message,
            } => format!("ERROR {} [{}]: {}: {}", path, profile, stage, message),
            ScanDiagnostic::Error {
                path,
                stage,
                profile: None,
                message,
            } => format!("ERROR {}: {}: {}", path, stage, message),
        }
    }
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_stderr())
    }
}

impl PartialOrd for ScanDiagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScanDiagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Counts of skipped and failed paths, for summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    pub skipped: usize,
    pub errors: usize,
}

impl DiagnosticSummary {
    pub fn from_diagnostics(diagnostics: &[ScanDiagnostic]) -> Self {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        Self {
            skipped: diagnostics.len() - errors,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_ord() {
        assert!(SkipReason::IgnoredInternal < SkipReason::Hidden);
        assert!(SkipReason::Hidden < SkipReason::IgnoredByGitignore);
        assert!(SkipReason::UnsupportedLanguage < SkipReason::Oversized);
    }

    #[test]
    fn test_diagnostic_stage_ord() {
        assert!(DiagnosticStage::Walk < DiagnosticStage::Read);
        assert!(DiagnosticStage::Read < DiagnosticStage::Extract);
        assert!(DiagnosticStage::Extract < DiagnosticStage::Other);
        assert_eq!(DiagnosticStage::Other.sort_key(), 3);
    }

    #[test]
    fn test_error_sorts_before_skip_on_same_path() {
        let error = ScanDiagnostic::error("src/a.rs", DiagnosticStage::Read, "boom");
        let skipped = ScanDiagnostic::skipped("src/a.rs", SkipReason::Oversized);
        assert!(error < skipped);
    }

    #[test]
    fn test_sorting_vec_by_path() {
        let mut diagnostics = vec![
            ScanDiagnostic::skipped("src/c.rs", SkipReason::ExcludedByGlob),
            ScanDiagnostic::error("src/a.rs", DiagnosticStage::Read, "error"),
            ScanDiagnostic::skipped("src/b.rs", SkipReason::IgnoredInternal),
        ];
        diagnostics.sort();
        let paths: Vec<&str> = diagnostics.iter().map(|d| d.path()).collect();
        assert_eq!(paths, vec!["src/a.rs", "src/b.rs", "src/c.rs"]);
    }

    #[test]
    fn test_format_stderr() {
        let skip = ScanDiagnostic::skipped("node_modules", SkipReason::IgnoredInternal);
        assert_eq!(skip.format_stderr(), "SKIP node_modules: internal ignore rule");

        let err = ScanDiagnostic::profile_error(
            "src/bad.py",
            "python",
            DiagnosticStage::Extract,
            "invalid UTF-8",
        );
        assert_eq!(
            err.to_string(),
            "ERROR src/bad.py [python]: extracting symbols: invalid UTF-8"
        );
    }

    #[test]
    fn test_json_shape() {
        let diag = ScanDiagnostic::skipped("big.js", SkipReason::Oversized);
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "skipped");
        assert_eq!(json["reason"], "Oversized");
    }

    #[test]
    fn test_summary_counts() {
        let diagnostics = vec![
            ScanDiagnostic::skipped("a", SkipReason::Hidden),
            ScanDiagnostic::error("b", DiagnosticStage::Read, "x"),
            ScanDiagnostic::skipped("c", SkipReason::Oversized),
        ];
        let summary = DiagnosticSummary::from_diagnostics(&diagnostics);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.errors, 1);
    }
}

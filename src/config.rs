//! Analysis configuration.
//!
//! Every knob has a default that matches the documented behavior, so an
//! empty JSON object (or no `--config` flag at all) yields the stock
//! analyzer. Fields missing from a config file fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Files above this size contribute zero symbols (1 MB).
pub const DEFAULT_MAX_EXTRACT_FILE_BYTES: u64 = 1_048_576;

/// Files above this size are inventoried with a zero line count (5 MB).
pub const DEFAULT_MAX_LINE_COUNT_BYTES: u64 = 5_242_880;

/// Build output and dependency directories that are never descended into.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "build",
    "dist",
    "target",
    "bin",
    "obj",
    "out",
    "__pycache__",
    ".venv",
    "venv",
    "packages",
    "Pods",
    ".gradle",
    ".idea",
    ".vs",
];

/// Ranking parameters for the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// BM25 term-frequency saturation.
    pub k1: f64,
    /// BM25 length normalization (0 = none, 1 = full).
    pub b: f64,
    /// Number of top-scored candidates considered by filtered/paged search.
    pub candidate_window: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            candidate_window: 500,
        }
    }
}

/// Top-level configuration for scanning, extraction and indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub max_extract_file_bytes: u64,
    pub max_line_count_bytes: u64,
    /// Directory names skipped wherever they appear in a path.
    pub ignore_dirs: Vec<String>,
    /// Skip any path segment starting with `.`.
    pub skip_hidden: bool,
    /// Honor `.gitignore` / `.ignore` at the repository root.
    pub respect_gitignore: bool,
    /// Include globs, relative to the root (empty = include all).
    pub include: Vec<String>,
    /// Exclude globs, relative to the root.
    pub exclude: Vec<String>,
    /// Process files and profiles on the rayon pool.
    pub parallel: bool,
    pub search: SearchConfig,
    /// Upper bound on registered search indexes; `None` = unbounded.
    pub max_cached_repositories: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_extract_file_bytes: DEFAULT_MAX_EXTRACT_FILE_BYTES,
            max_line_count_bytes: DEFAULT_MAX_LINE_COUNT_BYTES,
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|d| d.to_string()).collect(),
            skip_hidden: true,
            respect_gitignore: true,
            include: Vec::new(),
            exclude: Vec::new(),
            parallel: true,
            search: SearchConfig::default(),
            max_cached_repositories: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(input)
            .map_err(|e| AnalysisError::Config(format!("JSON parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Reject values the ranking and scanning code cannot work with.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if !search.k1.is_finite() || search.k1 < 0.0 {
            return Err(AnalysisError::Config(format!(
                "search.k1 must be a non-negative number, got {}",
                search.k1
            )));
        }
        if !search.b.is_finite() || !(0.0..=1.0).contains(&search.b) {
            return Err(AnalysisError::Config(format!(
                "search.b must be within [0, 1], got {}",
                search.b
            )));
        }
        if search.candidate_window == 0 {
            return Err(AnalysisError::Config(
                "search.candidate_window must be at least 1".to_string(),
            ));
        }
        if self.max_cached_repositories == Some(0) {
            return Err(AnalysisError::Config(
                "max_cached_repositories must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.max_extract_file_bytes, 1_048_576);
        assert_eq!(config.max_line_count_bytes, 5_242_880);
        assert!(config.ignore_dirs.iter().any(|d| d == "node_modules"));
    }

    #[test]
    fn test_partial_search_section() {
        let config = AnalysisConfig::from_json_str(r#"{"search": {"k1": 2.0}}"#).unwrap();
        assert_eq!(config.search.k1, 2.0);
        assert_eq!(config.search.b, 0.75);
        assert_eq!(config.search.candidate_window, 500);
    }

    #[test]
    fn test_invalid_b_rejected() {
        let err = AnalysisConfig::from_json_str(r#"{"search": {"b": 1.5}}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_zero_window_rejected() {
        let err =
            AnalysisConfig::from_json_str(r#"{"search": {"candidate_window": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("candidate_window"));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = AnalysisConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}

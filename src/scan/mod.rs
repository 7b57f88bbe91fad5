//! Repository scanner: one walk producing the file inventory.
//!
//! Every later stage (extraction, graph assembly, overview, indexing) reads
//! the [`FileInfo`] list produced here instead of walking the tree again.

pub mod filter;

pub use filter::FileFilter;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cancel::CancellationToken;
use crate::common::relative_path_string;
use crate::config::AnalysisConfig;
use crate::diagnostics::{DiagnosticStage, ScanDiagnostic, SkipReason};
use crate::error::{AnalysisError, Result};
use crate::ingest::Language;

/// One inventoried file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Path relative to the repository root, `/` separators
    pub relative_path: String,
    pub language: Language,
    pub size_bytes: u64,
    /// Zero when the file is above the line-count ceiling
    pub line_count: usize,
}

/// Inventory plus everything skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Sorted by relative path
    pub files: Vec<FileInfo>,
    /// Sorted by [`ScanDiagnostic`] order
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Line-counted file, or the diagnostic replacing it.
type Counted = std::result::Result<FileInfo, ScanDiagnostic>;

/// Check that `root` is an existing directory.
pub fn ensure_repository(root: &Path) -> Result<()> {
    if root.as_os_str().is_empty() {
        return Err(AnalysisError::MissingRepositoryPath);
    }
    if !root.is_dir() {
        return Err(AnalysisError::RepositoryNotFound(root.to_path_buf()));
    }
    Ok(())
}

/// Walk a repository and inventory every recognized file.
///
/// # Arguments
/// * `root` - Repository root directory
/// * `config` - Ignore rules and size ceilings
/// * `cancel` - Checked once per file
///
/// # Returns
/// `RepositoryNotFound` if `root` is not a directory, `Cancelled` if the
/// token fires. Per-path problems are diagnostics, never errors.
pub fn scan_files_with(
    root: &Path,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> Result<ScanReport> {
    ensure_repository(root)?;
    let filter = FileFilter::new(root, config)?;
    let mut diagnostics = Vec::new();
    let mut candidates: Vec<(String, PathBuf, Language, u64)> = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let rel = relative_path_string(root, entry.path());
            match filter.skip_dir(&rel) {
                Some(reason) => {
                    tracing::debug!(path = %rel, %reason, "skipping directory");
                    diagnostics.push(ScanDiagnostic::skipped(rel, reason));
                    false
                }
                None => true,
            }
        });

    let mut walk_errors = Vec::new();
    for entry in walker {
        cancel.check()?;
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                walk_errors.push(walk_error_diagnostic(root, &err));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = relative_path_string(root, entry.path());
        let language = match filter.classify_file(&rel) {
            Ok(language) => language,
            Err(reason) => {
                tracing::debug!(path = %rel, %reason, "skipping file");
                walk_errors.push(ScanDiagnostic::skipped(rel, reason));
                continue;
            }
        };
        match entry.metadata() {
            Ok(meta) => candidates.push((rel, entry.into_path(), language, meta.len())),
            Err(err) => {
                tracing::debug!(path = %rel, error = %err, "metadata unavailable");
                walk_errors.push(ScanDiagnostic::skipped(rel, SkipReason::Unreadable));
            }
        }
    }
    diagnostics.extend(walk_errors);

    let count = |(rel, path, language, size): (String, PathBuf, Language, u64)| -> Result<Counted> {
        cancel.check()?;
        if size > config.max_line_count_bytes {
            return Ok(Ok(FileInfo {
                relative_path: rel,
                language,
                size_bytes: size,
                line_count: 0,
            }));
        }
        Ok(match std::fs::read(&path) {
            Ok(bytes) => Ok(FileInfo {
                relative_path: rel,
                language,
                size_bytes: size,
                line_count: count_lines(&bytes),
            }),
            Err(err) => {
                tracing::debug!(path = %rel, error = %err, "unreadable file");
                Err(ScanDiagnostic::skipped(rel, SkipReason::Unreadable))
            }
        })
    };
    let counted: Vec<Counted> = if config.parallel {
        candidates.into_par_iter().map(count).collect::<Result<_>>()?
    } else {
        candidates.into_iter().map(count).collect::<Result<_>>()?
    };

    let mut files = Vec::with_capacity(counted.len());
    for item in counted {
        match item {
            Ok(info) => files.push(info),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    diagnostics.sort();

    tracing::info!(
        root = %root.display(),
        files = files.len(),
        skipped = diagnostics.len(),
        "scan complete"
    );
    Ok(ScanReport { files, diagnostics })
}

/// Inventory with default configuration and no cancellation.
pub fn scan_files(root: &Path) -> Result<Vec<FileInfo>> {
    Ok(scan_files_with(root, &AnalysisConfig::default(), &CancellationToken::new())?.files)
}

fn walk_error_diagnostic(root: &Path, err: &walkdir::Error) -> ScanDiagnostic {
    let rel = err
        .path()
        .map(|p| relative_path_string(root, p))
        .unwrap_or_default();
    let denied = err
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied);
    if denied {
        tracing::debug!(path = %rel, "access denied");
        ScanDiagnostic::skipped(rel, SkipReason::AccessDenied)
    } else {
        tracing::warn!(path = %rel, error = %err, "walk error");
        ScanDiagnostic::error(rel, DiagnosticStage::Walk, err.to_string())
    }
}

/// Number of lines; a final line without a trailing newline still counts.
pub fn count_lines(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    if bytes.last() == Some(&b'\n') {
        newlines
    } else {
        newlines + 1
    }
}

//! Path filtering for repository scans.
//!
//! Rules are checked in precedence order and the first match decides:
//! 1. Hard ignore list (`.git`, `node_modules`, `target`, ...)
//! 2. Hidden path segments (leading `.`)
//! 3. Gitignore-style rules (`.gitignore`, `.ignore` at the root)
//! 4. Language detection (unknown files are not inventoried)
//! 5. Include globs (if any), then exclude globs
//!
//! Filtering is a pure function of the relative path and the rule set.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

use crate::config::AnalysisConfig;
use crate::diagnostics::SkipReason;
use crate::error::{AnalysisError, Result};
use crate::ingest::{detect_language, Language};

/// Compiled filter for one repository root.
pub struct FileFilter {
    ignore_dirs: Vec<String>,
    skip_hidden: bool,
    gitignore: Option<Gitignore>,
    /// `None` = include everything
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl FileFilter {
    /// Build the filter for `root` from the analysis configuration.
    ///
    /// # Returns
    /// `AnalysisError::Config` when an include/exclude glob does not compile
    pub fn new(root: &Path, config: &AnalysisConfig) -> Result<Self> {
        let gitignore = if config.respect_gitignore {
            Some(Self::load_gitignore(root))
        } else {
            None
        };
        Ok(Self {
            ignore_dirs: config.ignore_dirs.clone(),
            skip_hidden: config.skip_hidden,
            gitignore,
            include: Self::compile_globs(&config.include)?,
            exclude: Self::compile_globs(&config.exclude)?,
        })
    }

    /// Compile rules from `.gitignore` and `.ignore`.
    ///
    /// A malformed ignore file is logged and otherwise ignored.
    fn load_gitignore(root: &Path) -> Gitignore {
        let mut builder = GitignoreBuilder::new(root);
        for name in [".gitignore", ".ignore"] {
            let path = root.join(name);
            if path.is_file() {
                if let Some(err) = builder.add(&path) {
                    tracing::warn!(file = %path.display(), error = %err, "failed to load ignore file");
                }
            }
        }
        builder.build().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignore rules could not be compiled");
            Gitignore::empty()
        })
    }

    fn compile_globs(patterns: &[String]) -> Result<Option<GlobSet>> {
        if patterns.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                AnalysisError::Config(format!("invalid glob pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map(Some)
            .map_err(|e| AnalysisError::Config(format!("invalid glob set: {}", e)))
    }

    /// Reason to prune a directory, checked before descending into it.
    ///
    /// # Arguments
    /// * `rel_path` - Directory path relative to the root, `/` separators
    pub fn skip_dir(&self, rel_path: &str) -> Option<SkipReason> {
        let name = crate::common::file_name(rel_path);
        if self.ignore_dirs.iter().any(|d| d == name) {
            return Some(SkipReason::IgnoredInternal);
        }
        if self.skip_hidden && name.starts_with('.') {
            return Some(SkipReason::Hidden);
        }
        if let Some(gitignore) = &self.gitignore {
            if gitignore.matched(rel_path, true).is_ignore() {
                return Some(SkipReason::IgnoredByGitignore);
            }
        }
        None
    }

    /// Decide whether a file is inventoried.
    ///
    /// # Returns
    /// The detected language, or the reason the file is skipped
    pub fn classify_file(&self, rel_path: &str) -> std::result::Result<Language, SkipReason> {
        let name = crate::common::file_name(rel_path);
        if self.skip_hidden && name.starts_with('.') {
            return Err(SkipReason::Hidden);
        }
        if let Some(gitignore) = &self.gitignore {
            if gitignore.matched(rel_path, false).is_ignore() {
                return Err(SkipReason::IgnoredByGitignore);
            }
        }
        let language = detect_language(Path::new(rel_path)).ok_or(SkipReason::UnsupportedLanguage)?;
        if let Some(include) = &self.include {
            if !include.is_match(rel_path) {
                return Err(SkipReason::ExcludedByGlob);
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel_path) {
                return Err(SkipReason::ExcludedByGlob);
            }
        }
        Ok(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn filter_for(root: &Path, config: AnalysisConfig) -> FileFilter {
        FileFilter::new(root, &config).unwrap()
    }

    #[test]
    fn test_internal_and_hidden_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let filter = filter_for(temp_dir.path(), AnalysisConfig::default());

        assert_eq!(filter.skip_dir("node_modules"), Some(SkipReason::IgnoredInternal));
        assert_eq!(filter.skip_dir("web/node_modules"), Some(SkipReason::IgnoredInternal));
        assert_eq!(filter.skip_dir(".git"), Some(SkipReason::IgnoredInternal));
        assert_eq!(filter.skip_dir(".cache"), Some(SkipReason::Hidden));
        assert_eq!(filter.skip_dir("src"), None);
    }

    #[test]
    fn test_hidden_files_can_be_allowed() {
        let temp_dir = TempDir::new().unwrap();
        let config = AnalysisConfig {
            skip_hidden: false,
            ..AnalysisConfig::default()
        };
        let filter = filter_for(temp_dir.path(), config);
        assert_eq!(filter.skip_dir(".github"), None);
        assert_eq!(filter.classify_file(".eslintrc.json"), Ok(Language::Json));
    }

    #[test]
    fn test_unsupported_and_build_files() {
        let temp_dir = TempDir::new().unwrap();
        let filter = filter_for(temp_dir.path(), AnalysisConfig::default());

        assert_eq!(filter.classify_file("notes.txt"), Err(SkipReason::UnsupportedLanguage));
        assert_eq!(filter.classify_file("Makefile"), Ok(Language::Build));
        assert_eq!(filter.classify_file("src/lib.rs"), Ok(Language::Rust));
        assert_eq!(filter.classify_file("src/.env.py"), Err(SkipReason::Hidden));
    }

    #[test]
    fn test_gitignore_rules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "generated/\n*.min.js\n").unwrap();
        let filter = filter_for(root, AnalysisConfig::default());

        assert_eq!(filter.skip_dir("generated"), Some(SkipReason::IgnoredByGitignore));
        assert_eq!(
            filter.classify_file("web/app.min.js"),
            Err(SkipReason::IgnoredByGitignore)
        );
        assert_eq!(filter.classify_file("web/app.js"), Ok(Language::JavaScript));
    }

    #[test]
    fn test_gitignore_can_be_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "*.py\n").unwrap();
        let config = AnalysisConfig {
            respect_gitignore: false,
            ..AnalysisConfig::default()
        };
        let filter = filter_for(root, config);
        assert_eq!(filter.classify_file("app.py"), Ok(Language::Python));
    }

    #[test]
    fn test_include_then_exclude() {
        let temp_dir = TempDir::new().unwrap();
        let config = AnalysisConfig {
            include: vec!["src/**".to_string()],
            exclude: vec!["**/*_test.go".to_string()],
            ..AnalysisConfig::default()
        };
        let filter = filter_for(temp_dir.path(), config);

        assert_eq!(filter.classify_file("src/main.go"), Ok(Language::Go));
        assert_eq!(filter.classify_file("docs/main.go"), Err(SkipReason::ExcludedByGlob));
        assert_eq!(filter.classify_file("src/main_test.go"), Err(SkipReason::ExcludedByGlob));
    }

    #[test]
    fn test_invalid_glob_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = AnalysisConfig {
            exclude: vec!["src/[".to_string()],
            ..AnalysisConfig::default()
        };
        let err = FileFilter::new(temp_dir.path(), &config).err().unwrap();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}

//! Heuristic import resolution over repository paths.
//!
//! An import token is turned into candidate relative paths by the profile's
//! [`ImportConvention`], then matched against every path in the repository.
//! Nothing here is semantic: a token with no matching path is an external
//! dependency and resolves to nothing.
//!
//! Resolution never returns the importing file itself.

use std::collections::{HashMap, HashSet};

use crate::common::{extension, file_name, join_relative, parent_dir, strip_extension};
use crate::ingest::engine::PendingImport;
use crate::ingest::profile::{ImportConvention, ImportKind, LanguageProfile};

/// Lookup structure over all repository-relative paths.
///
/// Suffix lookups go through the file-name bucket, so a lookup costs the
/// number of files sharing the final segment rather than the repository size.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    paths: HashSet<String>,
    by_name: HashMap<String, Vec<String>>,
    by_dir: HashMap<String, Vec<String>>,
}

impl PathIndex {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for path in paths {
            let path = path.into();
            if !index.paths.insert(path.clone()) {
                continue;
            }
            index
                .by_name
                .entry(file_name(&path).to_string())
                .or_default()
                .push(path.clone());
            index
                .by_dir
                .entry(parent_dir(&path).to_string())
                .or_default()
                .push(path);
        }
        for bucket in index.by_name.values_mut().chain(index.by_dir.values_mut()) {
            bucket.sort();
        }
        index
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Path equal to `suffix` or ending with `/suffix`.
    ///
    /// The shortest match wins, then the lexicographically smallest, so the
    /// result is independent of walk order.
    pub fn suffix_match(&self, suffix: &str) -> Option<&str> {
        let suffix = suffix.trim_start_matches('/');
        if suffix.is_empty() {
            return None;
        }
        let bucket = self.by_name.get(file_name(suffix))?;
        let slashed = format!("/{}", suffix);
        bucket
            .iter()
            .filter(|p| p.as_str() == suffix || p.ends_with(&slashed))
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(String::as_str)
    }

    /// Directory equal to `suffix` or ending with `/suffix`, same tie-breaks
    /// as [`suffix_match`](Self::suffix_match).
    pub fn dir_suffix_match(&self, suffix: &str) -> Option<&str> {
        let suffix = suffix.trim_matches('/');
        if suffix.is_empty() {
            return None;
        }
        let slashed = format!("/{}", suffix);
        self.by_dir
            .keys()
            .filter(|d| d.as_str() == suffix || d.ends_with(&slashed))
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(String::as_str)
    }

    /// Files directly inside `dir`, sorted.
    pub fn files_in(&self, dir: &str) -> &[String] {
        self.by_dir.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Resolves [`PendingImport`]s of one profile to repository paths.
pub struct ImportResolver<'a> {
    profile: &'a LanguageProfile,
    index: &'a PathIndex,
}

impl<'a> ImportResolver<'a> {
    pub fn new(profile: &'a LanguageProfile, index: &'a PathIndex) -> Self {
        Self { profile, index }
    }

    /// Target paths of one import, sorted and never containing `from`.
    ///
    /// # Arguments
    /// * `from` - Relative path of the importing file
    /// * `import` - Import recorded by the engine
    ///
    /// # Returns
    /// Empty when the import is external or matches nothing
    pub fn resolve(&self, from: &str, import: &PendingImport) -> Vec<String> {
        let token = import
            .token
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '<' || c == '>' || c == '`');
        if token.is_empty() {
            return Vec::new();
        }

        let mut targets = match import.kind {
            ImportKind::SiblingModule => self.sibling_module(from, token).into_iter().collect(),
            ImportKind::Relative => self.relative(from, token).into_iter().collect(),
            ImportKind::Standard => match self.profile.imports {
                ImportConvention::DotPackage => self.dot_package(token, &import.names),
                ImportConvention::PythonModule => self.python(from, token, &import.names),
                ImportConvention::JsModule => self.js(from, token).into_iter().collect(),
                ImportConvention::IncludePath => self.include(from, token).into_iter().collect(),
                ImportConvention::GoPackage => self.go(token),
                ImportConvention::RustModule => self.rust(from, token, &import.names),
                ImportConvention::RubyRequire => self.ruby(token).into_iter().collect(),
                ImportConvention::PhpNamespace => self.php(token).into_iter().collect(),
                ImportConvention::SwiftModule => self.swift(token),
                ImportConvention::DartPackage => self.dart(from, token).into_iter().collect(),
            },
        };

        targets.retain(|t| t != from);
        targets.sort();
        targets.dedup();
        targets
    }

    /// `base` itself, or `base.<ext>` for each resolve extension.
    fn exact(&self, base: &str) -> Option<String> {
        if self.index.contains(base) {
            return Some(base.to_string());
        }
        self.profile
            .resolve_extensions
            .iter()
            .map(|ext| format!("{}.{}", base, ext))
            .find(|candidate| self.index.contains(candidate))
    }

    /// Like [`exact`](Self::exact) but matching path suffixes.
    fn by_suffix(&self, base: &str) -> Option<String> {
        if extension(base).is_some_and(|ext| self.profile.handles_extension(&ext)) {
            if let Some(found) = self.index.suffix_match(base) {
                return Some(found.to_string());
            }
        }
        self.profile
            .resolve_extensions
            .iter()
            .find_map(|ext| self.index.suffix_match(&format!("{}.{}", base, ext)))
            .map(str::to_string)
    }

    /// Files of the profile's languages directly inside a directory.
    fn package_files(&self, dir: &str) -> Vec<String> {
        self.index
            .files_in(dir)
            .iter()
            .filter(|p| extension(p).is_some_and(|ext| self.profile.handles_extension(&ext)))
            .cloned()
            .collect()
    }

    fn relative(&self, from: &str, token: &str) -> Option<String> {
        let joined = join_relative(parent_dir(from), token)?;
        self.exact(&joined)
            .or_else(|| self.exact(&format!("{}/index", joined)))
    }

    fn sibling_module(&self, from: &str, name: &str) -> Option<String> {
        let dir = rust_module_dir(from);
        let base = join_dir(&dir, name);
        [format!("{}.rs", base), format!("{}/mod.rs", base)]
            .into_iter()
            .find(|candidate| self.index.contains(candidate))
    }

    fn dot_package(&self, token: &str, names: &[String]) -> Vec<String> {
        let token = token.trim_start_matches("static ").trim();
        let token = token.split('{').next().unwrap_or(token);
        let token = token
            .trim_end_matches(".*")
            .trim_end_matches("._")
            .trim_end_matches('.');
        let segments: Vec<&str> = token.split('.').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Vec::new();
        }

        for name in names {
            let mut with_name = segments.clone();
            with_name.push(name);
            if let Some(found) = self.drop_leading(&with_name, "/", 2) {
                return vec![found];
            }
        }
        if let Some(found) = self.drop_leading(&segments, "/", 2) {
            return vec![found];
        }
        // `a.b.Outer.Inner` names a nested type inside `Outer`
        if segments.len() > 2 {
            if let Some(found) = self.drop_leading(&segments[..segments.len() - 1], "/", 2) {
                return vec![found];
            }
        }
        if segments.len() >= 2 {
            for start in 0..=segments.len() - 2 {
                if let Some(dir) = self.index.dir_suffix_match(&segments[start..].join("/")) {
                    let files = self.package_files(dir);
                    if !files.is_empty() {
                        return files;
                    }
                }
            }
        }
        Vec::new()
    }

    /// Suffix-match `segments` joined by `/`, dropping leading segments
    /// while at least `min_keep` remain (a single-segment token is tried
    /// as is).
    fn drop_leading(&self, segments: &[&str], sep: &str, min_keep: usize) -> Option<String> {
        let keep = min_keep.min(segments.len()).max(1);
        (0..=segments.len() - keep).find_map(|start| self.by_suffix(&segments[start..].join(sep)))
    }

    fn python(&self, from: &str, token: &str, names: &[String]) -> Vec<String> {
        let dots = token.chars().take_while(|c| *c == '.').count();
        let rest = token[dots..].replace('.', "/");

        let found = if dots > 0 {
            let mut dir = parent_dir(from).to_string();
            for _ in 1..dots {
                if dir.is_empty() {
                    return Vec::new();
                }
                dir = parent_dir(&dir).to_string();
            }
            let base = join_dir(&dir, &rest);
            names
                .iter()
                .find_map(|name| self.exact(&join_dir(&base, name)))
                .or_else(|| if rest.is_empty() { None } else { self.exact(&base) })
                .or_else(|| self.exact(&join_dir(&base, "__init__")))
        } else {
            names
                .iter()
                .find_map(|name| self.by_suffix(&join_dir(&rest, name)))
                .or_else(|| self.by_suffix(&rest))
                .or_else(|| self.by_suffix(&join_dir(&rest, "__init__")))
        };
        found.into_iter().collect()
    }

    fn js(&self, from: &str, token: &str) -> Option<String> {
        let token = token.split(['?', '#']).next().unwrap_or(token);

        if token.starts_with("./") || token.starts_with("../") || token == "." || token == ".." {
            let joined = join_relative(parent_dir(from), token)?;
            return self.js_candidates(&joined, |c| self.exact(c));
        }
        if let Some(rest) = token.strip_prefix("@/").or_else(|| token.strip_prefix("~/")) {
            return self.js_candidates(rest, |c| self.by_suffix(c));
        }
        if let Some(rest) = token.strip_prefix('/') {
            return self.js_candidates(rest, |c| self.exact(c));
        }
        // bare specifiers and scoped packages come from node_modules
        if token.starts_with('@') || !token.contains('/') {
            return None;
        }
        self.js_candidates(token, |c| self.by_suffix(c))
    }

    /// Exact path, path without a `.js`-style extension (TypeScript sources
    /// import their compiled names), then `index` files.
    fn js_candidates(&self, base: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(found) = lookup(base) {
            return Some(found);
        }
        if extension(base).is_some_and(|ext| matches!(ext.as_str(), "js" | "jsx" | "mjs" | "cjs")) {
            if let Some(found) = lookup(strip_extension(base)) {
                return Some(found);
            }
        }
        lookup(&format!("{}/index", base))
    }

    fn include(&self, from: &str, token: &str) -> Option<String> {
        if let Some(joined) = join_relative(parent_dir(from), token) {
            if self.index.contains(&joined) {
                return Some(joined);
            }
        }
        self.index.suffix_match(token).map(str::to_string)
    }

    fn go(&self, token: &str) -> Vec<String> {
        let segments: Vec<&str> = token.split('/').filter(|s| !s.is_empty()).collect();
        // single-segment paths are the standard library
        if segments.len() < 2 {
            return Vec::new();
        }
        for start in 0..segments.len() {
            if let Some(dir) = self.index.dir_suffix_match(&segments[start..].join("/")) {
                let files = self.package_files(dir);
                if !files.is_empty() {
                    return files;
                }
            }
        }
        Vec::new()
    }

    fn rust(&self, from: &str, token: &str, names: &[String]) -> Vec<String> {
        let token = token.trim().trim_start_matches("::");
        let mut segments: Vec<&str> = token
            .split("::")
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "*")
            .collect();
        let Some(first) = segments.first().copied() else {
            return Vec::new();
        };
        if matches!(first, "std" | "core" | "alloc") {
            return Vec::new();
        }

        let found = match first {
            "crate" => {
                segments.remove(0);
                self.rust_longest(&segments, names, |p| {
                    self.index
                        .suffix_match(&format!("{}.rs", p))
                        .or_else(|| self.index.suffix_match(&format!("{}/mod.rs", p)))
                        .map(str::to_string)
                })
            }
            "self" | "super" => {
                let mut dir = rust_module_dir(from);
                while segments.first() == Some(&"super") {
                    segments.remove(0);
                    if dir.is_empty() {
                        return Vec::new();
                    }
                    dir = parent_dir(&dir).to_string();
                }
                if segments.first() == Some(&"self") {
                    segments.remove(0);
                }
                self.rust_longest(&segments, names, |p| self.rust_file(&join_dir(&dir, p)))
            }
            _ => {
                let dir = rust_module_dir(from);
                self.rust_longest(&segments, names, |p| self.rust_file(&join_dir(&dir, p)))
            }
        };
        found.into_iter().collect()
    }

    fn rust_file(&self, base: &str) -> Option<String> {
        [format!("{}.rs", base), format!("{}/mod.rs", base)]
            .into_iter()
            .find(|candidate| self.index.contains(candidate))
    }

    /// Longest module prefix of `segments` (with imported names first)
    /// that resolves to a file.
    fn rust_longest(
        &self,
        segments: &[&str],
        names: &[String],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        for name in names {
            if name == "self" {
                continue;
            }
            let mut with_name: Vec<&str> = segments.to_vec();
            with_name.push(name);
            if let Some(found) = lookup(&with_name.join("/")) {
                return Some(found);
            }
        }
        (1..=segments.len())
            .rev()
            .find_map(|n| lookup(&segments[..n].join("/")))
    }

    fn ruby(&self, token: &str) -> Option<String> {
        self.by_suffix(token.trim_start_matches("./"))
    }

    fn php(&self, token: &str) -> Option<String> {
        let token = token
            .trim_start_matches("function ")
            .trim_start_matches("const ")
            .trim_start_matches('\\');
        let segments: Vec<&str> = token.split('\\').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return None;
        }
        self.drop_leading(&segments, "/", 1)
    }

    fn swift(&self, token: &str) -> Vec<String> {
        match self.index.dir_suffix_match(token) {
            Some(dir) => self.package_files(dir),
            None => Vec::new(),
        }
    }

    fn dart(&self, from: &str, token: &str) -> Option<String> {
        if token.starts_with("dart:") {
            return None;
        }
        if let Some(package_path) = token.strip_prefix("package:") {
            let (_, within) = package_path.split_once('/')?;
            return self.index.suffix_match(within).map(str::to_string);
        }
        self.relative(from, token)
    }
}

/// Directory holding the child modules of a Rust source file.
///
/// `mod.rs`, `lib.rs` and `main.rs` own their directory; `a/b.rs` owns `a/b/`.
fn rust_module_dir(rel_path: &str) -> String {
    match file_name(rel_path) {
        "mod.rs" | "lib.rs" | "main.rs" => parent_dir(rel_path).to_string(),
        _ => strip_extension(rel_path).to_string(),
    }
}

fn join_dir(dir: &str, rest: &str) -> String {
    match (dir.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => dir.to_string(),
        _ => format!("{}/{}", dir, rest),
    }
}

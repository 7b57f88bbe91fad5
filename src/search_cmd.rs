//! `search`, `suggest` and `kinds` command implementations
//!
//! Each run builds a fresh index, either from a live analysis of `--root`
//! or from a saved analysis.

use anyhow::{Context, Result};
use cartograph::output::{output_json, KindsResponse, SearchResponse, SuggestResponse};
use cartograph::{CachedAnalysis, IndexRegistry};
use std::path::Path;

use crate::cli::{GlobalArgs, Source};

/// Registry holding the index of `source`, and the id it is registered under.
fn load_index(source: &Source, global: &GlobalArgs) -> Result<(IndexRegistry, String)> {
    let config = crate::load_config(global)?;
    let (repo_id, cached) = match source {
        Source::Root(root) => {
            let analyzer = crate::build_analyzer(global)?;
            let full = analyzer.analyze_full(root, None)?;
            (root.display().to_string(), full.into_cached())
        }
        Source::Analysis(path) => (path.display().to_string(), load_analysis(path)?),
    };

    let registry = IndexRegistry::new(config.search.clone(), config.max_cached_repositories);
    registry.build_index(&repo_id, &cached.symbols, &cached.files);
    Ok((registry, repo_id))
}

pub(crate) fn load_analysis(path: &Path) -> Result<CachedAnalysis> {
    CachedAnalysis::load(path).with_context(|| format!("Failed to load analysis {}", path.display()))
}

pub fn run_search(
    source: &Source,
    query: &str,
    kinds: &[String],
    skip: usize,
    take: usize,
    global: &GlobalArgs,
) -> Result<()> {
    let (registry, repo_id) = load_index(source, global)?;
    let page = registry.search(&repo_id, query, kinds, skip, take);

    if global.output_format.is_json() {
        let response = SearchResponse {
            query: query.to_string(),
            kinds: kinds.to_vec(),
            skip,
            take,
            total: page.total,
            results: page.results,
        };
        return output_json(response, global.output_format);
    }

    if page.results.is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }
    for result in &page.results {
        let doc = &result.document;
        println!(
            "{:>8.3}  {:<10} {:<40} {}:{}",
            result.score, doc.kind, doc.symbol, doc.file_path, doc.line
        );
    }
    println!();
    println!(
        "Showing {}-{} of {}",
        skip + 1,
        skip + page.results.len(),
        page.total
    );
    Ok(())
}

pub fn run_suggest(source: &Source, prefix: &str, limit: usize, global: &GlobalArgs) -> Result<()> {
    let (registry, repo_id) = load_index(source, global)?;
    let suggestions = registry.suggest(&repo_id, prefix, limit);

    if global.output_format.is_json() {
        let response = SuggestResponse {
            prefix: prefix.to_string(),
            suggestions,
        };
        return output_json(response, global.output_format);
    }

    for suggestion in &suggestions {
        println!("{}", suggestion);
    }
    Ok(())
}

pub fn run_kinds(source: &Source, global: &GlobalArgs) -> Result<()> {
    let (registry, repo_id) = load_index(source, global)?;
    let kinds = registry.available_kinds(&repo_id);

    if global.output_format.is_json() {
        return output_json(KindsResponse { kinds }, global.output_format);
    }

    for kind in &kinds {
        println!("{}", kind);
    }
    Ok(())
}

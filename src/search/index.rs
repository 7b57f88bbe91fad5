//! Ranked search over one repository's symbols and file names.
//!
//! Scoring is Okapi BM25:
//!
//! ```text
//! score(q, d) = Σ IDF(t) * tf(t,d) * (k1 + 1) / (tf(t,d) + k1 * (1 - b + b * |d| / avgdl))
//! IDF(t)      = ln((N - df(t) + 0.5) / (df(t) + 0.5) + 1)
//! ```
//!
//! summed over the distinct terms of the query words a document satisfies.
//! Equal scores keep document insertion order.
//!
//! Filtered and paged queries only look at the `candidate_window` best
//! scored documents. A kind that is rare among more than `candidate_window`
//! matches may therefore be under-reported, in both results and totals.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::common::file_name;
use crate::config::SearchConfig;
use crate::ingest::Symbol;
use crate::scan::FileInfo;

use super::tokenize::{identifier_tokens, tokenize};

/// Kind of the document indexed for every scanned file.
pub const FILE_KIND: &str = "File";

/// The unit of indexing: one per symbol plus one per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    pub file_path: String,
    /// Symbol name, or file name for file documents
    pub symbol: String,
    /// Indexed text
    pub content: String,
    /// Declaration line; 0 for file documents
    pub line: usize,
    pub kind: String,
}

impl IndexDocument {
    pub fn for_symbol(symbol: &Symbol) -> Self {
        Self {
            file_path: symbol.file_path.clone(),
            symbol: symbol.name.clone(),
            content: format!("{} {} {}", symbol.name, symbol.kind, file_name(&symbol.file_path)),
            line: symbol.line,
            kind: symbol.kind.as_str().to_string(),
        }
    }

    pub fn for_file(file: &FileInfo) -> Self {
        Self {
            file_path: file.relative_path.clone(),
            symbol: file_name(&file.relative_path).to_string(),
            content: file.relative_path.clone(),
            line: 0,
            kind: FILE_KIND.to_string(),
        }
    }
}

/// One scored hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub document: IndexDocument,
    pub score: f64,
}

/// A page of filtered results plus the filtered total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total: usize,
}

/// Immutable BM25 index. Built once, queried concurrently.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    documents: Vec<IndexDocument>,
    doc_lengths: Vec<usize>,
    /// term -> (document, term frequency), documents ascending
    postings: AHashMap<String, Vec<(usize, usize)>>,
    avg_doc_len: f64,
    /// (lowercased name, name), sorted and deduplicated
    names: Vec<(String, String)>,
    kinds: Vec<String>,
    config: SearchConfig,
}

impl SearchIndex {
    /// Index every symbol, then every file.
    pub fn build(symbols: &[Symbol], files: &[FileInfo], config: &SearchConfig) -> Self {
        let documents = symbols
            .iter()
            .map(IndexDocument::for_symbol)
            .chain(files.iter().map(IndexDocument::for_file))
            .collect();
        Self::from_documents(documents, config)
    }

    pub fn from_documents(documents: Vec<IndexDocument>, config: &SearchConfig) -> Self {
        let mut doc_lengths = Vec::with_capacity(documents.len());
        let mut postings: AHashMap<String, Vec<(usize, usize)>> = AHashMap::new();
        for (idx, doc) in documents.iter().enumerate() {
            let tokens = tokenize(&doc.content);
            doc_lengths.push(tokens.len());
            let mut term_freqs: AHashMap<String, usize> = AHashMap::new();
            for token in tokens {
                *term_freqs.entry(token).or_insert(0) += 1;
            }
            for (term, tf) in term_freqs {
                postings.entry(term).or_default().push((idx, tf));
            }
        }
        let total: usize = doc_lengths.iter().sum();
        let avg_doc_len = if documents.is_empty() {
            0.0
        } else {
            total as f64 / documents.len() as f64
        };

        let names: BTreeSet<(String, String)> = documents
            .iter()
            .map(|d| (d.symbol.to_lowercase(), d.symbol.clone()))
            .collect();
        let kinds: BTreeSet<String> = documents.iter().map(|d| d.kind.clone()).collect();

        tracing::debug!(
            documents = documents.len(),
            terms = postings.len(),
            "search index built"
        );
        Self {
            documents,
            doc_lengths,
            postings,
            avg_doc_len,
            names: names.into_iter().collect(),
            kinds: kinds.into_iter().collect(),
            config: config.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[IndexDocument] {
        &self.documents
    }

    /// Every matching document, best first.
    ///
    /// Query words are alternatives. A word that splits into parts
    /// (`loadUser`, `load_user`) only matches documents holding the whole
    /// identifier or every one of its parts.
    fn ranked(&self, query: &str) -> Vec<(usize, f64)> {
        let groups: Vec<Vec<String>> = identifier_tokens(query).collect();
        // document -> terms of the query words it satisfies
        let mut matched: AHashMap<usize, BTreeSet<&str>> = AHashMap::new();
        for group in &groups {
            for idx in self.group_matches(group) {
                matched
                    .entry(idx)
                    .or_default()
                    .extend(group.iter().map(String::as_str));
            }
        }

        let mut ranked: Vec<(usize, f64)> = matched
            .into_iter()
            .map(|(idx, terms)| {
                let score: f64 = terms.into_iter().filter_map(|t| self.weight(t, idx)).sum();
                (idx, score)
            })
            .collect();
        ranked.sort_by(|a, c| {
            c.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&c.0))
        });
        ranked
    }

    fn documents_with(&self, term: &str) -> AHashSet<usize> {
        self.postings
            .get(term)
            .map(|postings| postings.iter().map(|&(idx, _)| idx).collect())
            .unwrap_or_default()
    }

    /// Documents satisfying one query word's token group.
    fn group_matches(&self, group: &[String]) -> AHashSet<usize> {
        let Some((whole, parts)) = group.split_last() else {
            return AHashSet::new();
        };
        let Some((first, rest)) = parts.split_first() else {
            return self.documents_with(whole);
        };
        let mut docs = self.documents_with(first);
        for part in rest {
            let next = self.documents_with(part);
            docs.retain(|idx| next.contains(idx));
        }
        docs.extend(self.documents_with(whole));
        docs
    }

    /// BM25 contribution of `term` to document `idx`, if it occurs there.
    fn weight(&self, term: &str, idx: usize) -> Option<f64> {
        let postings = self.postings.get(term)?;
        let pos = postings.binary_search_by_key(&idx, |&(doc, _)| doc).ok()?;
        let tf = postings[pos].1 as f64;
        let n = self.documents.len() as f64;
        let df = postings.len() as f64;
        let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
        let (k1, b) = (self.config.k1, self.config.b);
        let norm = if self.avg_doc_len > 0.0 {
            self.doc_lengths[idx] as f64 / self.avg_doc_len
        } else {
            0.0
        };
        Some(idf * tf * (k1 + 1.0) / (tf + k1 * (1.0 - b + b * norm)))
    }

    fn result(&self, (idx, score): (usize, f64)) -> SearchResult {
        SearchResult {
            document: self.documents[idx].clone(),
            score,
        }
    }

    /// Best `max_results` documents for `query`.
    ///
    /// An empty query, or one with no matching term, yields no results.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        self.ranked(query)
            .into_iter()
            .take(max_results)
            .map(|hit| self.result(hit))
            .collect()
    }

    /// Candidate window filtered by kind (case-insensitive; empty = all).
    fn filtered(&self, query: &str, kinds: &[String]) -> Vec<(usize, f64)> {
        let wanted: AHashSet<String> = kinds.iter().map(|k| k.to_lowercase()).collect();
        let mut ranked = self.ranked(query);
        ranked.truncate(self.config.candidate_window);
        if !wanted.is_empty() {
            ranked.retain(|&(idx, _)| wanted.contains(&self.documents[idx].kind.to_lowercase()));
        }
        ranked
    }

    /// One page of kind-filtered results.
    ///
    /// # Arguments
    /// * `kinds` - Wanted kinds, case-insensitive; empty means every kind
    /// * `skip` / `take` - Page window over the filtered list
    ///
    /// The kind filter runs after the candidate window is cut, so `total`
    /// can undercount broad queries with a narrow filter.
    pub fn search_page(&self, query: &str, kinds: &[String], skip: usize, take: usize) -> SearchPage {
        let filtered = self.filtered(query, kinds);
        let total = filtered.len();
        let results = filtered
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|hit| self.result(hit))
            .collect();
        SearchPage { results, total }
    }

    /// Size of the filtered candidate set `search_page` pages over.
    pub fn search_count(&self, query: &str, kinds: &[String]) -> usize {
        self.filtered(query, kinds).len()
    }

    /// Distinct names starting with `prefix` (case-insensitive), alphabetical.
    pub fn suggest(&self, prefix: &str, max_results: usize) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() || max_results == 0 {
            return Vec::new();
        }
        let start = self.names.partition_point(|(lower, _)| lower.as_str() < prefix.as_str());
        self.names[start..]
            .iter()
            .take_while(|(lower, _)| lower.starts_with(&prefix))
            .take(max_results)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Distinct kinds present, sorted.
    pub fn available_kinds(&self) -> Vec<String> {
        self.kinds.clone()
    }
}

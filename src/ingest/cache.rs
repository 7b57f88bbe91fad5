//! Memo of per-repository extraction results.
//!
//! Entries are keyed by `(profile id, canonical repository root)` and carry a
//! BLAKE3 fingerprint of the file inventory they were computed from. A
//! lookup with a different fingerprint is a miss and the recomputed output
//! replaces the entry, so re-analysing a changed repository never serves
//! stale data. Different repositories live under different keys and never
//! contend on the same shard lock for long: computation happens outside the
//! map.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use crate::error::Result;
use crate::ingest::extractor::ProfileOutput;
use crate::scan::FileInfo;

/// Hit/miss counters of a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

impl CacheStats {
    /// Hit rate between 0.0 and 1.0.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    profile: String,
    root: PathBuf,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: blake3::Hash,
    output: Arc<ProfileOutput>,
}

/// Thread-safe memo of [`ProfileOutput`]s.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: DashMap<CacheKey, CacheEntry>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached output, or `compute` run and stored.
    ///
    /// # Arguments
    /// * `profile` - Profile id
    /// * `root` - Repository root; canonicalized for the key
    /// * `fingerprint` - See [`fingerprint`]
    /// * `compute` - Producer run on a miss
    ///
    /// # Guarantees
    /// - A failed `compute` (e.g. cancellation) stores nothing
    /// - A stored entry always matches the fingerprint it was computed for
    pub fn get_or_compute<F>(
        &self,
        profile: &str,
        root: &Path,
        fingerprint: blake3::Hash,
        compute: F,
    ) -> Result<Arc<ProfileOutput>>
    where
        F: FnOnce() -> Result<ProfileOutput>,
    {
        let key = CacheKey {
            profile: profile.to_string(),
            root: canonical_root(root),
        };
        if let Some(entry) = self.entries.get(&key) {
            if entry.fingerprint == fingerprint {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(profile, root = %key.root.display(), "extraction cache hit");
                return Ok(Arc::clone(&entry.output));
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let output = Arc::new(compute()?);
        self.entries.insert(
            key,
            CacheEntry {
                fingerprint,
                output: Arc::clone(&output),
            },
        );
        Ok(output)
    }

    /// Drop every profile's entry for a repository.
    ///
    /// # Returns
    /// Number of entries removed
    pub fn invalidate(&self, root: &Path) -> usize {
        let root = canonical_root(root);
        let before = self.entries.len();
        self.entries.retain(|key, _| key.root != root);
        before - self.entries.len()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.entries.len(),
        }
    }
}

fn canonical_root(root: &Path) -> PathBuf {
    std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
}

/// Fingerprint of an inventory: relative path, size and modification time
/// of every file, in inventory order.
///
/// Files whose metadata cannot be read hash with a zero timestamp.
pub fn fingerprint(root: &Path, files: &[FileInfo]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    for file in files {
        let modified = std::fs::metadata(root.join(&file.relative_path))
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        hasher.update(file.relative_path.as_bytes());
        hasher.update(&[0]);
        hasher.update(&file.size_bytes.to_le_bytes());
        hasher.update(&modified.to_le_bytes());
    }
    hasher.finalize()
}

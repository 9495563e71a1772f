//! Content-hash cache of per-file extraction results.
//!
//! Entries are keyed by file id and validated by the SHA-256 of the file
//! content, so unchanged files skip re-parsing. A missing, corrupt or
//! version-mismatched cache file is treated as empty.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::extractor::FileAnalysis;

/// Current on-disk format version. Bump when [`FileAnalysis`] changes shape
/// or an extractor changes what it reports.
pub const CACHE_VERSION: u32 = 1;

/// Errors writing the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to write the cache file.
    #[error("failed to write cache {path}: {source}")]
    Io {
        /// Cache file path.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to serialize the cache.
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One cached extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// SHA-256 of the file content (hex).
    pub hash: String,
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
    /// The extraction result.
    pub result: FileAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    version: u32,
    entries: BTreeMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Scan cache backed by a JSON file.
#[derive(Debug)]
pub struct ScanCache {
    path: PathBuf,
    data: CacheData,
    dirty: bool,
}

impl ScanCache {
    /// Creates an empty cache that will be written to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: CacheData::default(),
            dirty: false,
        }
    }

    /// Loads the cache from `path`, falling back to an empty cache.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(path),
            Err(e) => {
                warn!("Failed to read cache {}: {e}; starting empty", path.display());
                return Self::new(path);
            }
        };
        match serde_json::from_str::<CacheData>(&content) {
            Ok(data) if data.version == CACHE_VERSION => {
                debug!("Loaded {} cache entries from {}", data.entries.len(), path.display());
                Self {
                    path,
                    data,
                    dirty: false,
                }
            }
            Ok(data) => {
                warn!(
                    "Discarding cache {} with version {} (expected {CACHE_VERSION})",
                    path.display(),
                    data.version
                );
                Self::new(path)
            }
            Err(e) => {
                warn!("Discarding corrupt cache {}: {e}", path.display());
                Self::new(path)
            }
        }
    }

    /// SHA-256 of file content as lowercase hex.
    #[must_use]
    pub fn content_hash(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        format!("{:x}", hasher.finalize())
    }

    /// Cached result for `file` if its content hash still matches.
    #[must_use]
    pub fn get(&self, file: &str, hash: &str) -> Option<&FileAnalysis> {
        self.data
            .entries
            .get(file)
            .filter(|e| e.hash == hash)
            .map(|e| &e.result)
    }

    /// Stores a fresh result.
    pub fn insert(&mut self, file: impl Into<String>, hash: impl Into<String>, result: FileAnalysis) {
        self.data.entries.insert(
            file.into(),
            CacheEntry {
                hash: hash.into(),
                timestamp: Utc::now(),
                result,
            },
        );
        self.dirty = true;
    }

    /// Drops entries for files that are no longer scanned.
    pub fn retain_files(&mut self, files: &HashSet<&str>) {
        let before = self.data.entries.len();
        self.data.entries.retain(|k, _| files.contains(k.as_str()));
        if self.data.entries.len() != before {
            self.dirty = true;
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.entries.len()
    }

    /// True if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.entries.is_empty()
    }

    /// Cache file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the cache if it changed since loading.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&mut self) -> Result<(), CacheError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        let content = serde_json::to_string(&self.data)?;
        fs::write(&self.path, content).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ImportSite;

    fn analysis() -> FileAnalysis {
        FileAnalysis {
            package: None,
            imports: vec![ImportSite::at_line("./b", 1)],
        }
    }

    #[test]
    fn hit_requires_matching_hash() {
        let mut cache = ScanCache::new("unused.json");
        let hash = ScanCache::content_hash(b"import './b';");
        cache.insert("a.ts", hash.clone(), analysis());
        assert_eq!(cache.get("a.ts", &hash), Some(&analysis()));
        assert!(cache.get("a.ts", "other").is_none());
        assert!(cache.get("b.ts", &hash).is_none());
    }

    #[test]
    fn hash_is_hex_sha256() {
        let h = ScanCache::content_hash(b"");
        assert_eq!(
            h,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".archgate/cache.json");
        let mut cache = ScanCache::new(&path);
        cache.insert("a.ts", "h1", analysis());
        cache.save().unwrap();

        let reloaded = ScanCache::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("a.ts", "h1"), Some(&analysis()));
    }

    #[test]
    fn corrupt_cache_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ScanCache::load(&path).is_empty());
    }

    #[test]
    fn version_mismatch_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, r#"{"version": 999, "entries": {}}"#).unwrap();
        assert!(ScanCache::load(&path).is_empty());
    }

    #[test]
    fn retain_prunes_removed_files() {
        let mut cache = ScanCache::new("unused.json");
        cache.insert("a.ts", "h", analysis());
        cache.insert("b.ts", "h", analysis());
        let keep: HashSet<&str> = ["a.ts"].into_iter().collect();
        cache.retain_files(&keep);
        assert_eq!(cache.len(), 1);
    }
}

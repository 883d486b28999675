//! Write-through JSON cache persisted to a single file
//!
//! The whole mapping is loaded once at startup and rewritten in full after
//! every miss, before control returns to the caller.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when persisting the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Writing the cache file or creating its directory failed
    #[error("Failed to write cache file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache contents could not be serialized
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Disk-backed cache mapping string keys to serializable values
///
/// The file is a JSON object whose keys are the cache keys. A missing,
/// unreadable or corrupt file yields an empty cache rather than an error.
#[derive(Debug)]
pub struct DiskCache<V> {
    /// File the cache is persisted to
    path: PathBuf,
    entries: BTreeMap<String, V>,
}

impl<V> DiskCache<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Loads the cache from `path`, starting empty if the file is unusable
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt cache file");
                BTreeMap::new()
            }),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No cache file, starting empty");
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored value for `key` without fetching
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached value for `key`, fetching, storing and saving on a miss
    ///
    /// On a miss the full mapping is written to disk before this returns.
    ///
    /// # Arguments
    /// * `key` - Lookup key
    /// * `fetch` - Produces the value on a miss; not called on a hit
    ///
    /// # Returns
    /// * `Ok(&V)` - The stored value
    /// * `Err(E)` - The fetch failed (nothing stored) or the save failed
    pub async fn get_or_fetch<F, Fut, E>(&mut self, key: &str, fetch: F) -> Result<&V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: From<CacheError>,
    {
        if self.entries.contains_key(key) {
            debug!(path = %self.path.display(), key, "Using cache");
            return Ok(&self.entries[key]);
        }

        debug!(path = %self.path.display(), key, "Fetching");
        let value = fetch().await?;
        self.entries.insert(key.to_string(), value);
        self.save()?;

        Ok(&self.entries[key])
    }

    /// Writes the entire mapping to disk, creating parent directories
    pub fn save(&self) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    type Index = BTreeMap<String, String>;

    fn sample_index() -> Index {
        let mut index = Index::new();
        index.insert(
            "michigan".to_string(),
            "https://www.nps.gov/state/mi/index.htm".to_string(),
        );
        index.insert(
            "wyoming".to_string(),
            "https://www.nps.gov/state/wy/index.htm".to_string(),
        );
        index
    }

    fn create_test_cache() -> (DiskCache<Index>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = DiskCache::load(temp_dir.path().join("site.json"));
        (cache, temp_dir)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.is_empty());
        assert!(cache.get("anything").is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("site.json");
        fs::write(&path, "{ not json").expect("Should write file");

        let cache: DiskCache<Index> = DiskCache::load(&path);

        assert!(cache.is_empty(), "Corrupt file should load as empty cache");
    }

    #[tokio::test]
    async fn test_miss_writes_through_to_disk() {
        let (mut cache, temp_dir) = create_test_cache();

        cache
            .get_or_fetch("https://www.nps.gov", || async {
                Ok::<_, CacheError>(sample_index())
            })
            .await
            .expect("Fetch should succeed");

        let path = temp_dir.path().join("site.json");
        assert!(path.exists(), "Cache file should exist after a miss");

        let content = fs::read_to_string(&path).expect("Should read file");
        assert!(content.contains("\"https://www.nps.gov\""));
        assert!(content.contains("\"michigan\""));
    }

    #[tokio::test]
    async fn test_reload_round_trip() {
        let (mut cache, temp_dir) = create_test_cache();
        cache
            .get_or_fetch("session", || async { Ok::<_, CacheError>(sample_index()) })
            .await
            .expect("Fetch should succeed");

        let reloaded: DiskCache<Index> = DiskCache::load(temp_dir.path().join("site.json"));

        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("session"), Some(&sample_index()));
    }

    #[tokio::test]
    async fn test_persisted_entry_is_not_refetched_after_reload() {
        let (mut cache, temp_dir) = create_test_cache();
        cache
            .get_or_fetch("session", || async { Ok::<_, CacheError>(sample_index()) })
            .await
            .expect("Fetch should succeed");

        let mut reloaded: DiskCache<Index> = DiskCache::load(temp_dir.path().join("site.json"));
        let calls = Cell::new(0);
        let index = reloaded
            .get_or_fetch("session", || async {
                calls.set(calls.get() + 1);
                Ok::<_, CacheError>(Index::new())
            })
            .await
            .expect("Lookup should succeed");

        assert_eq!(index, &sample_index());
        assert_eq!(calls.get(), 0, "Persisted key should not be fetched again");
    }

    #[tokio::test]
    async fn test_save_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("dir").join("site.json");
        let mut cache: DiskCache<Index> = DiskCache::load(&path);

        cache
            .get_or_fetch("session", || async { Ok::<_, CacheError>(sample_index()) })
            .await
            .expect("Fetch should succeed");

        assert!(path.exists(), "Nested cache file should be created");
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_file_untouched() {
        let (mut cache, temp_dir) = create_test_cache();

        let result = cache
            .get_or_fetch("session", || async {
                Err::<Index, _>(CacheError::Serialize(
                    serde_json::from_str::<Index>("nope").unwrap_err(),
                ))
            })
            .await;

        assert!(result.is_err());
        assert!(cache.is_empty());
        assert!(!temp_dir.path().join("site.json").exists());
    }
}

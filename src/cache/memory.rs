//! Process-lifetime memoization cache

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use tracing::debug;

/// In-memory cache that fetches each distinct key at most once
///
/// Entries are never evicted and vanish when the process exits. The cache is
/// not synchronized; it is meant to be owned by a single session.
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    /// Label used in log lines (e.g. "site-detail")
    name: &'static str,
    entries: HashMap<K, V>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Creates an empty cache with a label for log output
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached value for `key`, fetching and storing it on a miss
    ///
    /// # Arguments
    /// * `key` - Lookup key
    /// * `fetch` - Produces the value on a miss; not called on a hit
    ///
    /// # Returns
    /// * `Ok(&V)` - The stored value
    /// * `Err(E)` - The fetch failed; nothing is stored, so a later call retries
    pub async fn get_or_fetch<F, Fut, E>(&mut self, key: &K, fetch: F) -> Result<&V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if self.entries.contains_key(key) {
            debug!(cache = self.name, ?key, "Using cache");
            return Ok(&self.entries[key]);
        }

        debug!(cache = self.name, ?key, "Fetching");
        let value = fetch().await?;
        Ok(self.entries.entry(key.clone()).or_insert(value))
    }

    /// Returns true if a value is stored for `key`
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

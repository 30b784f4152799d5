//! Cache Engine
//!
//! `Cache` is the single object the service layer talks to. Build it once at
//! startup, wrap it in an `Arc` and hand clones to every consumer; the
//! background sweeper takes one of those clones too.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::{
    keys, CacheSnapshot, CacheStats, CacheStore, EntryMetadata, IndexSet, IndexValue,
};
use crate::config::Config;
use crate::error::Result;
use crate::models::{CachedValue, IndexedItem, PreloadReport};

// == Cache ==
/// Entry store, statistics and secondary indexes behind one handle.
#[derive(Debug)]
pub struct Cache {
    store: CacheStore<CachedValue>,
    indexes: IndexSet<IndexedItem>,
    pub(crate) preload_marker_ttl: Duration,
    pub(crate) warm_up_limit: usize,
    pub(crate) preload_concurrency: usize,
}

impl Cache {
    // == Constructors ==
    /// Creates a cache from configuration.
    ///
    /// Fails with [`CacheError::InvalidCapacity`](crate::error::CacheError::InvalidCapacity)
    /// when `max_entries` is zero.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store: CacheStore::new(config.max_entries, config.default_ttl)?,
            indexes: IndexSet::new(),
            preload_marker_ttl: config.preload_marker_ttl,
            warm_up_limit: config.warm_up_limit,
            preload_concurrency: config.preload_concurrency.max(1),
        })
    }

    /// Creates a cache with the given capacity and default TTL, other settings
    /// at their defaults.
    pub fn with_capacity(max_entries: usize, default_ttl: Duration) -> Result<Self> {
        Self::new(&Config {
            max_entries,
            default_ttl,
            ..Config::default()
        })
    }

    // == Entry Store ==
    /// Returns the live value for `key`, or None if it is absent, expired or evicted.
    pub fn get(&self, key: &str) -> Option<Arc<CachedValue>> {
        self.store.get(key)
    }

    /// Stores `value` under `key`; `None` uses the default TTL.
    pub fn set(&self, key: impl Into<String>, value: CachedValue, ttl: Option<Duration>) {
        self.store.set(key, value, ttl);
    }

    /// Removes `key`, returning true if an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.store.delete(key)
    }

    /// Drops every entry, resets statistics and rebuilds the default indexes.
    pub fn clear(&self) {
        self.store.clear();
        self.indexes.clear();
        info!("Cache cleared");
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Physical presence check that does not count as a read.
    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    pub fn metadata(&self, key: &str) -> Option<EntryMetadata> {
        self.store.metadata(key)
    }

    // == Invalidation ==
    /// Removes every key matching the regular expression `pattern`.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        let removed = self.store.invalidate_pattern(pattern)?;
        debug!("Invalidated {} entries matching '{}'", removed, pattern);
        Ok(removed)
    }

    /// Removes the detail and children cached for one entity.
    pub fn invalidate_entity(&self, id: &str) -> Result<usize> {
        self.invalidate_pattern(&keys::related_pattern(id))
    }

    /// Removes expired entries; called by the sweeper.
    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }

    // == Statistics ==
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    // == Secondary Indexes ==
    /// Appends a single item to, or replaces the list under, `keyword`.
    pub fn update_index(
        &self,
        index_name: &str,
        keyword: &str,
        value: impl Into<IndexValue<IndexedItem>>,
    ) {
        self.indexes.update(index_name, keyword, value);
    }

    /// Case-insensitive substring search; unknown indexes return nothing.
    pub fn search_index(&self, index_name: &str, query: &str) -> Vec<IndexedItem> {
        self.indexes.search(index_name, query)
    }

    pub fn index_names(&self) -> Vec<String> {
        self.indexes.names()
    }

    // == Preload Marker ==
    /// True once a preload has cached at least one entity and its marker is live.
    pub fn is_preload_completed(&self) -> bool {
        self.get(keys::PRELOAD_MARKER)
            .and_then(|value| value.as_preload_marker().map(|r| r.entities_preloaded > 0))
            .unwrap_or(false)
    }

    /// The last preload report, or an all-zero report if none is live.
    pub fn preload_stats(&self) -> PreloadReport {
        self.get(keys::PRELOAD_MARKER)
            .and_then(|value| value.as_preload_marker().cloned())
            .unwrap_or_default()
    }

    // == Persistence ==
    pub fn export(&self) -> CacheSnapshot<CachedValue> {
        self.store.export()
    }

    /// Imports a snapshot, skipping entries that expired in the meantime.
    pub fn import(&self, snapshot: CacheSnapshot<CachedValue>) -> usize {
        self.store.import(snapshot)
    }
}

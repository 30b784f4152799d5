//! Cache Store Module
//!
//! Main cache engine combining sharded storage with LRU eviction and TTL expiration.
//!
//! Reads and overwrites of existing keys only take the shard lock of their key.
//! Inserting a new key additionally takes `insert_guard`, which serializes the
//! capacity check, the eviction scan and the insert so the store never holds
//! more than `max_entries` entries. Removals never need the guard because they
//! can only shrink the map.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::lru::select_victim;
use crate::cache::snapshot::{CacheSnapshot, SnapshotEntry};
use crate::cache::stats::{format_hit_rate, format_memory, ENTRY_OVERHEAD_BYTES};
use crate::cache::{CacheEntry, CacheStats, StatsCounters};
use crate::error::{CacheError, Result};

/// Read-only view of an entry's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub stored_at: u64,
    pub ttl: Duration,
    pub access_count: u64,
    pub last_accessed_at: u64,
    /// Lifetime left when the metadata was read, zero once expired
    pub ttl_remaining: Duration,
}

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: DashMap<String, CacheEntry<V>>,
    /// Held while a new key is admitted
    insert_guard: Mutex<()>,
    /// Source of recency stamps
    clock: AtomicU64,
    /// Performance statistics
    stats: StatsCounters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL for entries stored without an explicit one
    default_ttl: Duration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold, at least 1
    /// * `default_ttl` - TTL for entries stored without an explicit TTL
    pub fn new(max_entries: usize, default_ttl: Duration) -> Result<Self> {
        if max_entries == 0 {
            return Err(CacheError::InvalidCapacity(max_entries));
        }

        Ok(Self {
            entries: DashMap::new(),
            insert_guard: Mutex::new(()),
            clock: AtomicU64::new(0),
            stats: StatsCounters::new(),
            max_entries,
            default_ttl,
        })
    }

    fn next_tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the entry is replaced: fresh timestamp, fresh
    /// TTL and a zero access count. If the key is new and the cache is at
    /// capacity, the least recently used entry is evicted first.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the default TTL if None)
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl, self.next_tick());
        self.insert_entry(key.into(), entry);
    }

    fn insert_entry(&self, key: String, entry: CacheEntry<V>) {
        // Overwrite in place under the shard lock; the size does not change
        if let Some(mut existing) = self.entries.get_mut(&key) {
            *existing = entry;
            return;
        }

        let _guard = self
            .insert_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_one();
        }
        self.entries.insert(key, entry);
    }

    // == Evict ==
    /// Removes the least recently used entry. Caller holds `insert_guard`.
    fn evict_one(&self) {
        if let Some(victim) = select_victim(&self.entries) {
            if self.entries.remove(&victim).is_some() {
                self.stats.record_eviction();
                debug!("Evicted least recently used key '{}'", victim);
            }
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired, recording a hit and
    /// refreshing the entry's recency. Missing and expired keys both count as
    /// a miss; an expired entry is removed on the spot.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let now = current_timestamp_ms();

        if let Some(mut entry) = self.entries.get_mut(key) {
            if !entry.is_expired_at(now) {
                entry.touch(self.next_tick());
                self.stats.record_hit();
                return Some(Arc::clone(&entry.value));
            }
        }

        // Re-check before removing so a concurrent overwrite survives
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            self.stats.record_expirations(1);
            debug!("Lazily removed expired key '{}'", key);
        }

        self.stats.record_miss();
        None
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true if an entry, live or expired, was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and resets the statistics.
    pub fn clear(&self) {
        let _guard = self
            .insert_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.entries.clear();
        self.stats.reset();
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Sweeping is not a read: hit and miss counters are left untouched.
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut removed = 0usize;

        self.entries.retain(|_, entry| {
            let expired = entry.is_expired_at(now);
            if expired {
                removed += 1;
            }
            !expired
        });

        self.stats.record_expirations(removed as u64);
        removed
    }

    // == Invalidate Pattern ==
    /// Removes every key matching the regular expression `pattern`.
    ///
    /// Expired entries are removed too. A malformed pattern is rejected with
    /// [`CacheError::InvalidPattern`] before anything is touched.
    /// Returns the number of entries removed.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        let regex = Regex::new(pattern)?;
        Ok(self.invalidate_matching(&regex))
    }

    /// Removes every key matched by an already compiled expression.
    pub fn invalidate_matching(&self, regex: &Regex) -> usize {
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|item| regex.is_match(item.key()))
            .map(|item| item.key().clone())
            .collect();

        matching
            .iter()
            .filter(|key| self.entries.remove(key.as_str()).is_some())
            .count()
    }

    // == Metadata ==
    /// Returns an entry's metadata without counting as a read.
    pub fn metadata(&self, key: &str) -> Option<EntryMetadata> {
        self.entries.get(key).map(|entry| EntryMetadata {
            stored_at: entry.stored_at,
            ttl: entry.ttl,
            access_count: entry.access_count,
            last_accessed_at: entry.last_accessed_at,
            ttl_remaining: entry.ttl_remaining(),
        })
    }

    /// Checks physical presence without counting as a read.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Snapshot of the keys currently present.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|item| item.key().clone()).collect()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}

impl<V: Serialize> CacheStore<V> {
    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let hits = self.stats.hits();
        let misses = self.stats.misses();
        let memory_bytes = self.estimate_memory();

        CacheStats {
            size: self.entries.len(),
            max_size: self.max_entries,
            hits,
            misses,
            evictions: self.stats.evictions(),
            expirations: self.stats.expirations(),
            hit_rate: format_hit_rate(hits, misses),
            memory_bytes,
            memory_usage: format_memory(memory_bytes),
        }
    }

    /// Sums the JSON length of every key and value plus a fixed overhead.
    fn estimate_memory(&self) -> usize {
        self.entries
            .iter()
            .map(|item| {
                let key_len = serde_json::to_string(item.key()).map_or(0, |s| s.len());
                let value_len = serde_json::to_vec(item.value().value.as_ref()).map_or(0, |v| v.len());
                key_len + value_len + ENTRY_OVERHEAD_BYTES
            })
            .sum()
    }
}

impl<V: Clone> CacheStore<V> {
    // == Export ==
    /// Copies every present entry into a serializable snapshot.
    pub fn export(&self) -> CacheSnapshot<V> {
        let entries: BTreeMap<String, SnapshotEntry<V>> = self
            .entries
            .iter()
            .map(|item| {
                let entry = item.value();
                let snapshot = SnapshotEntry {
                    value: (*entry.value).clone(),
                    stored_at: entry.stored_at,
                    ttl_ms: u64::try_from(entry.ttl.as_millis()).unwrap_or(u64::MAX),
                };
                (item.key().clone(), snapshot)
            })
            .collect();

        CacheSnapshot { entries }
    }

    // == Import ==
    /// Loads a snapshot, skipping entries already expired.
    ///
    /// Each imported entry keeps only the lifetime it had left when exported.
    /// Returns the number of entries imported.
    pub fn import(&self, snapshot: CacheSnapshot<V>) -> usize {
        self.import_at(snapshot, current_timestamp_ms())
    }

    /// Same as [`import`](Self::import) against a caller-supplied clock.
    ///
    /// Uses the store's own expiry rule: an entry aged exactly its TTL is
    /// still live and comes in with zero lifetime left.
    pub(crate) fn import_at(&self, snapshot: CacheSnapshot<V>, now: u64) -> usize {
        let mut imported = 0;

        for (key, item) in snapshot.entries {
            let age = now.saturating_sub(item.stored_at);
            if age > item.ttl_ms {
                continue;
            }
            let remaining = Duration::from_millis(item.ttl_ms - age);
            self.set(key, item.value, Some(remaining));
            imported += 1;
        }

        imported
    }
}

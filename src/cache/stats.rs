//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.
//!
//! Counters are atomics so readers can record hits while holding only a shard
//! lock on the entry map. `CacheStats` is the serializable snapshot handed to
//! callers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Fixed per-entry overhead added to the memory estimate, in bytes.
pub const ENTRY_OVERHEAD_BYTES: usize = 64;

// == Stats Counters ==
/// Cumulative counters shared by every caller of a store.
#[derive(Debug, Default)]
pub struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl StatsCounters {
    /// Creates counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an entry removed to enforce capacity.
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts entries removed because their TTL elapsed, lazily or by a sweep.
    pub fn record_expirations(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn expirations(&self) -> u64 {
        self.expirations.load(Ordering::Relaxed)
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
    }
}

// == Cache Stats ==
/// Point-in-time view of a store's metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Physically present entries, including expired ones not yet swept
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries removed after their TTL elapsed
    pub expirations: u64,
    /// Hit rate as a percentage string, e.g. `"66.67%"`
    pub hit_rate: String,
    /// Estimated footprint of keys and values in bytes
    pub memory_bytes: usize,
    /// `memory_bytes` rendered in megabytes, e.g. `"0.01 MB"`
    pub memory_usage: String,
}

/// Formats a hit rate as a percentage with two decimals, `"0%"` with no reads.
pub fn format_hit_rate(hits: u64, misses: u64) -> String {
    let total = hits + misses;
    if total == 0 {
        return "0%".to_string();
    }
    // Hundredths of a percent, with halves rounded up
    let scaled = u128::from(hits) * 10_000;
    let total = u128::from(total);
    let hundredths = (scaled * 2 + total) / (total * 2);
    format!("{}.{:02}%", hundredths / 100, hundredths % 100)
}

/// Formats a byte count in megabytes with two decimals.
pub fn format_memory(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

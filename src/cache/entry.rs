//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with per-entry TTL and
//! access metadata.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// The value is held behind an `Arc`: the entry owns it once stored and readers
/// receive a shared handle instead of a copy.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: Arc<V>,
    /// Insertion or last overwrite timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Lifetime measured from `stored_at`
    pub ttl: Duration,
    /// Number of successful reads since the last overwrite
    pub access_count: u64,
    /// Timestamp of the last successful read, or `stored_at` (Unix milliseconds)
    pub last_accessed_at: u64,
    /// Store-wide recency stamp; the smallest tick is the eviction victim
    pub(crate) access_tick: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Lifetime of the entry
    /// * `tick` - Recency stamp issued by the owning store
    pub fn new(value: V, ttl: Duration, tick: u64) -> Self {
        Self::stored_at(Arc::new(value), current_timestamp_ms(), ttl, tick)
    }

    pub(crate) fn stored_at(value: Arc<V>, stored_at: u64, ttl: Duration, tick: u64) -> Self {
        Self {
            value,
            stored_at,
            ttl,
            access_count: 0,
            last_accessed_at: stored_at,
            access_tick: tick,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired by `now_ms`.
    ///
    /// An entry is expired once strictly more than `ttl` has elapsed since it
    /// was stored, so an entry read at exactly `stored_at + ttl` is still live.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        u128::from(now_ms.saturating_sub(self.stored_at)) > self.ttl.as_millis()
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        let age = Duration::from_millis(current_timestamp_ms().saturating_sub(self.stored_at));
        self.ttl.saturating_sub(age)
    }

    // == Touch ==
    /// Records a successful read.
    pub(crate) fn touch(&mut self, tick: u64) {
        self.access_count += 1;
        self.last_accessed_at = current_timestamp_ms();
        self.access_tick = tick;
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

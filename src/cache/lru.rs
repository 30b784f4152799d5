//! LRU Victim Selection
//!
//! Picks the least recently used entry when the store is over capacity.
//!
//! Selection is a full scan for the smallest access tick. Every insert, overwrite
//! and hit stamps a fresh tick from the store's counter, so the minimum is unique.
//! The scan is O(n) per eviction, which only happens on inserts at capacity.

use dashmap::DashMap;

use crate::cache::CacheEntry;

// == Select Victim ==
/// Returns the key of the least recently accessed entry.
///
/// Returns None if the map is empty.
pub fn select_victim<V>(entries: &DashMap<String, CacheEntry<V>>) -> Option<String> {
    entries
        .iter()
        .min_by_key(|item| item.value().access_tick)
        .map(|item| item.key().clone())
}

//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction, pattern
//! invalidation and secondary indexes.

mod entry;
mod index;
pub mod keys;
mod lru;
mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use index::{
    IndexSet, IndexValue, CHILDREN_BY_NAME, DEFAULT_INDEXES, ENTITIES_BY_NAME,
    QUESTIONS_BY_KEYWORD,
};
pub use snapshot::{CacheSnapshot, SnapshotEntry};
pub use stats::{format_hit_rate, CacheStats, StatsCounters, ENTRY_OVERHEAD_BYTES};
pub use store::{CacheStore, EntryMetadata};

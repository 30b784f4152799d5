//! Warm Cache - An in-process cache engine
//!
//! Sits between a service's data-access layer and its backing store, with
//! per-entry TTL expiration, LRU eviction, pattern invalidation, secondary
//! indexes and a startup warm-up/preload phase fed by an injected loader.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod preload;
pub mod tasks;

pub use config::Config;
pub use engine::Cache;
pub use error::{CacheError, LoaderError};
pub use preload::{EntityLoader, JsonFileLoader};
pub use tasks::{spawn_sweeper, SweeperHandle};

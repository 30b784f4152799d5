//! Preload Module
//!
//! Populates the cache from an injected loader before traffic arrives.
//!
//! - Warm-up: detail of a handful of entities, fetched sequentially
//! - Preload: every entity with its children, fetched concurrently, plus
//!   name index updates and a completion marker

mod loader;
mod orchestrator;

pub use loader::{EntityLoader, JsonFileLoader};

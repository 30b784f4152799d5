//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.
//!
//! Cache misses and expirations are not errors: `get` returns `None` for both.
//! The variants here cover caller misuse (bad capacity, malformed pattern) and
//! snapshot persistence. Loader failures have their own type so the preload
//! orchestrator can record them per item without ever propagating them.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Capacity must be at least one entry
    #[error("Invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// Pattern passed to `invalidate_pattern` is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Snapshot file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Loader Error Enum ==
/// Failure reported by an [`EntityLoader`](crate::preload::EntityLoader).
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The requested entity does not exist in the backing source
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// The backing source could not serve the request
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// Reading the backing source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing source returned data that could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

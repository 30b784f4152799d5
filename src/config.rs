//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL applied to entries stored without an explicit TTL
    pub default_ttl: Duration,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Interval between background sweeps of expired entries
    pub sweep_interval: Duration,
    /// TTL of the marker entry written when a preload finishes
    pub preload_marker_ttl: Duration,
    /// Number of entities fetched by `warm_up`
    pub warm_up_limit: usize,
    /// Maximum number of entity tasks in flight during `preload_all`
    pub preload_concurrency: usize,
    /// Dataset served by the file loader at startup
    pub data_file: Option<PathBuf>,
    /// Where the cache snapshot is imported from and exported to
    pub snapshot_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL_SECS` - Default TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 60)
    /// - `CACHE_PRELOAD_MARKER_TTL_SECS` - Preload marker TTL in seconds (default: 86400)
    /// - `CACHE_WARM_UP_LIMIT` - Entities fetched during warm-up (default: 5)
    /// - `CACHE_PRELOAD_CONCURRENCY` - Preload fan-out (default: 16)
    /// - `CACHE_DATA_FILE` - JSON dataset for the file loader (default: unset)
    /// - `CACHE_SNAPSHOT_FILE` - Snapshot path (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_ttl: env_secs("CACHE_DEFAULT_TTL_SECS").unwrap_or(defaults.default_ttl),
            max_entries: env_parse("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            sweep_interval: env_secs("CACHE_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.sweep_interval),
            preload_marker_ttl: env_secs("CACHE_PRELOAD_MARKER_TTL_SECS")
                .unwrap_or(defaults.preload_marker_ttl),
            warm_up_limit: env_parse("CACHE_WARM_UP_LIMIT").unwrap_or(defaults.warm_up_limit),
            preload_concurrency: env_parse("CACHE_PRELOAD_CONCURRENCY")
                .unwrap_or(defaults.preload_concurrency),
            data_file: env::var_os("CACHE_DATA_FILE").map(PathBuf::from),
            snapshot_file: env::var_os("CACHE_SNAPSHOT_FILE").map(PathBuf::from),
        }
    }

    /// Rejects configurations the cache cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidCapacity(self.max_entries));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            max_entries: 1000,
            sweep_interval: Duration::from_secs(60),
            preload_marker_ttl: Duration::from_secs(24 * 60 * 60),
            warm_up_limit: 5,
            preload_concurrency: 16,
            data_file: None,
            snapshot_file: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_secs(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_secs)
}

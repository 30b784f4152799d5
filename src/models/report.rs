//! Summaries produced by warm-up and preload runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a full preload, also stored as the preload marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreloadReport {
    pub completed_at: DateTime<Utc>,
    pub successful: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub entities_preloaded: usize,
    #[serde(default)]
    pub failures: Vec<PreloadFailure>,
}

/// One entity the preload could not cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreloadFailure {
    pub entity_id: String,
    pub error: String,
}

/// Outcome of a warm-up run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmUpReport {
    pub cached: usize,
    pub failed: usize,
}

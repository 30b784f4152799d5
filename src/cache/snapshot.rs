//! Snapshot Module
//!
//! Serializable form of a store's contents, used for best-effort persistence
//! across restarts.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One exported entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry<V> {
    pub value: V,
    /// Unix milliseconds at which the entry was stored
    pub stored_at: u64,
    pub ttl_ms: u64,
}

/// Exported store contents keyed by cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot<V> {
    pub entries: BTreeMap<String, SnapshotEntry<V>>,
}

impl<V> Default for CacheSnapshot<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> CacheSnapshot<V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> CacheSnapshot<V> {
    /// Writes the snapshot as JSON.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = serde_json::to_vec(self)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

impl<V: DeserializeOwned> CacheSnapshot<V> {
    /// Reads a snapshot previously written by [`save`](Self::save).
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

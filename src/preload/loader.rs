//! Loader capability consumed by warm-up and preload.

use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LoaderError;
use crate::models::{ChildRecord, EntityDetail, EntitySummary};

/// Source of entities for warm-up and preload.
///
/// Implementations own their timeout and retry policy; the orchestrator only
/// records the error they return.
#[async_trait]
pub trait EntityLoader: Send + Sync {
    /// Lists top-level entities. `skip_cache` asks the loader to bypass any
    /// cache of its own.
    async fn list_entities(&self, skip_cache: bool) -> Result<Vec<EntitySummary>, LoaderError>;

    /// Fetches one entity with full detail, children included.
    async fn fetch_entity(&self, id: &str) -> Result<EntityDetail, LoaderError>;

    /// Fetches one entity's child collection.
    async fn fetch_children(&self, id: &str) -> Result<Vec<ChildRecord>, LoaderError> {
        Ok(self.fetch_entity(id).await?.children)
    }
}

#[derive(Debug, Deserialize)]
struct Dataset {
    entities: Vec<EntityDetail>,
}

// == JSON File Loader ==
/// Loader serving a dataset read from a JSON file of the form
/// `{ "entities": [ { "id": ..., "name": ..., "children": [...] } ] }`.
#[derive(Debug, Clone, Default)]
pub struct JsonFileLoader {
    entities: IndexMap<String, EntityDetail>,
}

impl JsonFileLoader {
    /// Reads and decodes the dataset at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let bytes = tokio::fs::read(path).await?;
        let dataset: Dataset = serde_json::from_slice(&bytes)?;
        Ok(Self::from_entities(dataset.entities))
    }

    pub fn from_entities(entities: Vec<EntityDetail>) -> Self {
        Self {
            entities: entities
                .into_iter()
                .map(|entity| (entity.id.clone(), entity))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[async_trait]
impl EntityLoader for JsonFileLoader {
    async fn list_entities(&self, _skip_cache: bool) -> Result<Vec<EntitySummary>, LoaderError> {
        Ok(self.entities.values().map(EntityDetail::summary).collect())
    }

    async fn fetch_entity(&self, id: &str) -> Result<EntityDetail, LoaderError> {
        self.entities
            .get(id)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound(id.to_string()))
    }
}

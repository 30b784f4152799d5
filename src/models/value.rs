//! Payloads held by the cache and its indexes.

use serde::{Deserialize, Serialize};

use crate::models::{ChildRecord, EntityDetail, EntitySummary, PreloadReport};

/// Every shape of value the cache stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CachedValue {
    EntityList(Vec<EntitySummary>),
    Entity(EntityDetail),
    Children(Vec<ChildRecord>),
    PreloadMarker(PreloadReport),
    /// Anything else a caller wants cached
    Json(serde_json::Value),
}

impl CachedValue {
    pub fn as_entity(&self) -> Option<&EntityDetail> {
        match self {
            CachedValue::Entity(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn as_children(&self) -> Option<&[ChildRecord]> {
        match self {
            CachedValue::Children(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_entity_list(&self) -> Option<&[EntitySummary]> {
        match self {
            CachedValue::EntityList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_preload_marker(&self) -> Option<&PreloadReport> {
        match self {
            CachedValue::PreloadMarker(report) => Some(report),
            _ => None,
        }
    }
}

/// Item stored in a secondary index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexedItem {
    Entity(EntitySummary),
    Child(ChildRecord),
    Json { value: serde_json::Value },
}

impl IndexedItem {
    /// Id of the underlying record, None for raw JSON.
    pub fn id(&self) -> Option<&str> {
        match self {
            IndexedItem::Entity(summary) => Some(&summary.id),
            IndexedItem::Child(child) => Some(&child.id),
            IndexedItem::Json { .. } => None,
        }
    }
}

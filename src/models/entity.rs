//! Entity DTOs exchanged with the loader
//!
//! Entities are the top-level resources of the backing store; each owns a
//! collection of child records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extra fields carried through untouched.
pub type Attributes = BTreeMap<String, Value>;

/// Entry in the entity list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

impl EntitySummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Attributes::new(),
        }
    }
}

/// One entity with full detail, children included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDetail {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<ChildRecord>,
}

impl EntityDetail {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Adds a child record, returning self for chaining.
    pub fn with_child(mut self, child: ChildRecord) -> Self {
        self.children.push(child);
        self
    }

    /// The list-level view of this entity.
    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Record owned by an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub id: String,
    pub name: String,
    /// Owning entity, filled in when the record is indexed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

impl ChildRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            attributes: Attributes::new(),
        }
    }

    /// Copy of this record tagged with its owning entity.
    pub fn with_parent(&self, parent_id: &str) -> Self {
        Self {
            parent_id: Some(parent_id.to_string()),
            ..self.clone()
        }
    }
}

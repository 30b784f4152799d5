//! Secondary Indexes
//!
//! Named keyword-to-items mappings that back substring search. Indexes live
//! beside the entry store but have no TTL: they change only through
//! `update` and are emptied only by `clear`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;

/// Index of entities keyed by lower-cased name.
pub const ENTITIES_BY_NAME: &str = "entities_by_name";
/// Index of child records keyed by lower-cased name.
pub const CHILDREN_BY_NAME: &str = "children_by_name";
/// Index of questions keyed by keyword.
pub const QUESTIONS_BY_KEYWORD: &str = "questions_by_keyword";

/// Indexes that exist, empty, on a fresh or cleared cache.
pub const DEFAULT_INDEXES: [&str; 3] = [ENTITIES_BY_NAME, CHILDREN_BY_NAME, QUESTIONS_BY_KEYWORD];

// == Index Value ==
/// What `update` does to a keyword's list.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexValue<T> {
    /// Append one item to the keyword's list, creating it if absent
    One(T),
    /// Replace the keyword's list
    Many(Vec<T>),
}

impl<T> From<Vec<T>> for IndexValue<T> {
    fn from(items: Vec<T>) -> Self {
        IndexValue::Many(items)
    }
}

type Index<T> = IndexMap<String, Vec<T>>;

// == Index Set ==
/// A collection of named indexes.
#[derive(Debug)]
pub struct IndexSet<T> {
    indexes: RwLock<HashMap<String, Index<T>>>,
}

impl<T> Default for IndexSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexSet<T> {
    /// Creates the set with the default indexes in place.
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(default_indexes()),
        }
    }

    /// Adds to or replaces the list stored under `keyword` in `index_name`.
    ///
    /// The index is created on first use. Keywords are stored lower-cased.
    pub fn update(&self, index_name: &str, keyword: &str, value: impl Into<IndexValue<T>>) {
        let mut indexes = self.indexes.write().unwrap_or_else(PoisonError::into_inner);
        let index = indexes.entry(index_name.to_string()).or_default();
        let keyword = keyword.to_lowercase();

        match value.into() {
            IndexValue::Many(items) => {
                index.insert(keyword, items);
            }
            IndexValue::One(item) => index.entry(keyword).or_default().push(item),
        }
    }

    /// Names of the indexes that currently exist.
    pub fn names(&self) -> Vec<String> {
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = indexes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drops every index and recreates the empty defaults.
    pub fn clear(&self) {
        let mut indexes = self.indexes.write().unwrap_or_else(PoisonError::into_inner);
        *indexes = default_indexes();
    }
}

impl<T: Clone> IndexSet<T> {
    /// Case-insensitive substring search over an index's keywords.
    ///
    /// Returns the concatenated lists of every matching keyword, in the order
    /// keywords were first added. An unknown index yields an empty result.
    pub fn search(&self, index_name: &str, query: &str) -> Vec<T> {
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        let Some(index) = indexes.get(index_name) else {
            return Vec::new();
        };

        let needle = query.to_lowercase();
        index
            .iter()
            .filter(|(keyword, _)| keyword.contains(&needle))
            .flat_map(|(_, items)| items.iter().cloned())
            .collect()
    }
}

fn default_indexes<T>() -> HashMap<String, Index<T>> {
    DEFAULT_INDEXES
        .iter()
        .map(|name| (name.to_string(), IndexMap::new()))
        .collect()
}

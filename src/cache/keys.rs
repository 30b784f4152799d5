//! Cache key conventions.
//!
//! Keys are a namespace prefix plus the identifying parameters, joined with `_`.

/// Key of the marker written when a preload finishes.
pub const PRELOAD_MARKER: &str = "preload_completed";

/// Key of the full entity list.
pub const ENTITY_LIST: &str = "entities_all";

/// Key of one entity's full detail.
pub fn entity(id: &str) -> String {
    format!("entity_{}", id)
}

/// Key of one entity's child collection.
pub fn children(id: &str) -> String {
    format!("children_{}", id)
}

/// Pattern matching every key cached for one entity.
///
/// Anchored and escaped, so `related_pattern("1")` leaves `entity_12` alone.
pub fn related_pattern(id: &str) -> String {
    format!("^(entity|children)_{}$", regex::escape(id))
}

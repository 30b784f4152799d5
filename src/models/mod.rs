//! Data Models Module
//!
//! Entity DTOs supplied by the loader and the payload shapes kept in the cache.

mod entity;
mod report;
mod value;

pub use entity::{Attributes, ChildRecord, EntityDetail, EntitySummary};
pub use report::{PreloadFailure, PreloadReport, WarmUpReport};
pub use value::{CachedValue, IndexedItem};

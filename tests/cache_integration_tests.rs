//! Integration Tests for the Cache Engine
//!
//! Drives the public API the way a service layer would: a shared `Arc<Cache>`,
//! a loader implementation, the sweeper, and snapshot persistence.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use async_trait::async_trait;
use warm_cache::cache::{keys, CacheSnapshot, IndexValue, CHILDREN_BY_NAME, ENTITIES_BY_NAME};
use warm_cache::models::{CachedValue, ChildRecord, EntityDetail, EntitySummary, IndexedItem};
use warm_cache::{spawn_sweeper, Cache, CacheError, Config, EntityLoader, LoaderError};

// == Helper Functions ==

fn create_test_cache(max_entries: usize) -> Cache {
    Cache::with_capacity(max_entries, Duration::from_secs(300)).unwrap()
}

fn json(value: &str) -> CachedValue {
    CachedValue::Json(serde_json::json!(value))
}

/// Exam catalogue loader with a configurable set of broken entities.
struct CatalogueLoader {
    exams: Vec<EntityDetail>,
    broken: Vec<String>,
}

impl CatalogueLoader {
    fn with_exams(count: usize) -> Self {
        let exams = (1..=count)
            .map(|i| {
                EntityDetail::new(format!("exam{}", i), format!("Exam Number {}", i))
                    .with_child(ChildRecord::new(format!("s{}", i), format!("Subject {}", i)))
            })
            .collect();
        Self {
            exams,
            broken: Vec::new(),
        }
    }
}

#[async_trait]
impl EntityLoader for CatalogueLoader {
    async fn list_entities(&self, _skip_cache: bool) -> Result<Vec<EntitySummary>, LoaderError> {
        Ok(self.exams.iter().map(EntityDetail::summary).collect())
    }

    async fn fetch_entity(&self, id: &str) -> Result<EntityDetail, LoaderError> {
        if self.broken.iter().any(|b| b == id) {
            return Err(LoaderError::Unavailable(format!("query for {} timed out", id)));
        }
        self.exams
            .iter()
            .find(|exam| exam.id == id)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound(id.to_string()))
    }
}

// == TTL ==

#[test]
fn test_ttl_expired_entry_is_absent() {
    let cache = create_test_cache(10);

    cache.set("short", json("v"), Some(Duration::from_millis(50)));
    sleep(Duration::from_millis(60));

    assert!(cache.get("short").is_none());
}

#[test]
fn test_overwrite_restores_full_life() {
    let cache = create_test_cache(10);
    let ttl = Some(Duration::from_millis(1000));

    cache.set("k", json("v1"), ttl);
    sleep(Duration::from_millis(900));
    cache.set("k", json("v2"), ttl);
    sleep(Duration::from_millis(900));

    // 1800ms after the first set
    assert_eq!(*cache.get("k").unwrap(), json("v2"));
}

// == Capacity and LRU ==

#[test]
fn test_lru_evicts_least_recently_read() {
    let cache = create_test_cache(2);

    cache.set("A", json("a"), None);
    cache.set("B", json("b"), None);
    assert!(cache.get("A").is_some());
    cache.set("C", json("c"), None);

    assert!(cache.get("B").is_none());
    assert!(cache.get("A").is_some());
    assert!(cache.get("C").is_some());
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_capacity_misconfiguration_fails_fast() {
    let config = Config {
        max_entries: 0,
        ..Config::default()
    };
    assert!(matches!(
        Cache::new(&config),
        Err(CacheError::InvalidCapacity(0))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_handlers_share_cache() {
    let cache = Arc::new(create_test_cache(32));

    let handles: Vec<_> = (0..16)
        .map(|worker| {
            let cache = cache.clone();
            tokio::spawn(async move {
                for i in 0..100 {
                    let key = format!("exam_{}_{}", worker % 4, i % 48);
                    if cache.get(&key).is_none() {
                        cache.set(key, json("fetched"), None);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let stats = cache.stats();
    assert!(stats.size <= 32);
    assert_eq!(stats.hits + stats.misses, 1600);
}

// == Pattern Invalidation ==

#[test]
fn test_pattern_invalidation_is_idempotent() {
    let cache = create_test_cache(10);
    cache.set(keys::entity("upsc"), json("detail"), None);
    cache.set(keys::children("upsc"), json("subjects"), None);
    cache.set(keys::entity("ssc"), json("detail"), None);

    assert_eq!(cache.invalidate_pattern("upsc").unwrap(), 2);
    assert_eq!(cache.invalidate_pattern("upsc").unwrap(), 0);
    assert!(cache.get(&keys::entity("upsc")).is_none());
    assert!(cache.get(&keys::entity("ssc")).is_some());
}

#[test]
fn test_malformed_pattern_is_rejected() {
    let cache = create_test_cache(10);
    assert!(matches!(
        cache.invalidate_pattern("exam_(["),
        Err(CacheError::InvalidPattern(_))
    ));
}

// == Statistics ==

#[test]
fn test_stats_report() {
    let cache = create_test_cache(10);
    assert_eq!(cache.stats().hit_rate, "0%");

    cache.set("k", json("v"), None);
    cache.get("k");
    cache.get("k");
    cache.get("missing");

    let stats = cache.stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.max_size, 10);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hit_rate, "66.67%");
    assert!(stats.memory_bytes > 0);
    assert!(stats.memory_usage.ends_with(" MB"));
}

// == Secondary Indexes ==

#[test]
fn test_index_search_is_case_insensitive_substring() {
    let cache = create_test_cache(10);
    let upsc = EntitySummary::new("upsc", "Union Public Service Commission");
    cache.update_index(
        ENTITIES_BY_NAME,
        &upsc.name,
        IndexValue::One(IndexedItem::Entity(upsc.clone())),
    );

    assert_eq!(
        cache.search_index(ENTITIES_BY_NAME, "union"),
        vec![IndexedItem::Entity(upsc)]
    );
}

#[test]
fn test_indexes_survive_expiry_but_not_clear() {
    let cache = create_test_cache(10);
    cache.set("k", json("v"), Some(Duration::from_millis(10)));
    cache.update_index(
        "topics",
        "Modern History",
        vec![IndexedItem::Json {
            value: serde_json::json!({"topic": "1857"}),
        }],
    );
    sleep(Duration::from_millis(30));

    assert!(cache.get("k").is_none());
    assert_eq!(cache.search_index("topics", "history").len(), 1);

    cache.clear();
    assert!(cache.search_index("topics", "history").is_empty());
}

// == Warm-up and Preload ==

#[tokio::test]
async fn test_preload_resilience() {
    let cache = create_test_cache(100);
    let mut loader = CatalogueLoader::with_exams(5);
    loader.broken.push("exam3".to_string());

    let report = cache.preload_all(&loader).await;

    assert_eq!(report.successful, 4);
    assert_eq!(report.failed, 1);
    for id in ["exam1", "exam2", "exam4", "exam5"] {
        let value = cache.get(&keys::entity(id)).unwrap();
        assert_eq!(value.as_entity().unwrap().id, id);
    }
    assert!(cache.get(&keys::entity("exam3")).is_none());
    assert!(cache.is_preload_completed());
    assert_eq!(cache.preload_stats().failures[0].entity_id, "exam3");
}

#[test]
fn test_preload_indexes_children_by_name() {
    let cache = create_test_cache(100);
    let loader = CatalogueLoader::with_exams(3);

    tokio_test::block_on(cache.preload_all(&loader));

    let subjects = cache.search_index(CHILDREN_BY_NAME, "SUBJECT 2");
    assert_eq!(subjects.len(), 1);
    match &subjects[0] {
        IndexedItem::Child(child) => {
            assert_eq!(child.id, "s2");
            assert_eq!(child.parent_id.as_deref(), Some("exam2"));
        }
        other => panic!("expected a child record, got {:?}", other),
    }
}

#[test]
fn test_warm_up_then_preload() {
    let cache = create_test_cache(100);
    let loader = CatalogueLoader::with_exams(8);

    let warm = tokio_test::block_on(cache.warm_up(&loader));
    assert_eq!(warm.cached, 5);
    assert!(!cache.is_preload_completed());

    let report = tokio_test::block_on(cache.preload_all(&loader));
    assert_eq!(report.successful, 8);
    assert!(cache.is_preload_completed());
}

#[test]
fn test_loader_as_trait_object() {
    let cache = create_test_cache(100);
    let loader: Box<dyn EntityLoader> = Box::new(CatalogueLoader::with_exams(2));

    let report = tokio_test::block_on(cache.preload_all(loader.as_ref()));
    assert_eq!(report.successful, 2);
}

// == Sweeper ==

#[tokio::test]
async fn test_sweeper_bounds_write_only_keys() {
    let cache = Arc::new(create_test_cache(100));
    for i in 0..10 {
        cache.set(format!("once_{}", i), json("v"), Some(Duration::from_millis(10)));
    }

    let sweeper = spawn_sweeper(cache.clone(), Duration::from_millis(25));
    tokio::time::sleep(Duration::from_millis(150)).await;
    sweeper.shutdown().await;

    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 0);
}

// == Persistence ==

#[tokio::test]
async fn test_snapshot_file_roundtrip() {
    let source = create_test_cache(10);
    source.set(keys::entity("upsc"), json("detail"), None);
    source.set("gone", json("v"), Some(Duration::from_millis(5)));
    tokio::time::sleep(Duration::from_millis(20)).await;

    let path = std::env::temp_dir().join(format!(
        "warm_cache_it_snapshot_{}.json",
        std::process::id()
    ));
    source.export().save(&path).await.unwrap();

    let restored = create_test_cache(10);
    let snapshot: CacheSnapshot<CachedValue> = CacheSnapshot::load(&path).await.unwrap();
    let _ = tokio::fs::remove_file(&path).await;

    assert_eq!(restored.import(snapshot), 1);
    assert_eq!(*restored.get(&keys::entity("upsc")).unwrap(), json("detail"));
    assert!(!restored.contains_key("gone"));
}

#[test]
fn test_miss_paths_are_indistinguishable() {
    let cache = create_test_cache(1);
    let mut seen = HashMap::new();

    cache.set("expired", json("v"), Some(Duration::from_millis(5)));
    sleep(Duration::from_millis(20));
    seen.insert("expired", cache.get("expired").is_none());

    cache.set("evicted", json("v"), None);
    cache.set("other", json("v"), None);
    seen.insert("evicted", cache.get("evicted").is_none());

    seen.insert("never", cache.get("never").is_none());

    assert!(seen.values().all(|absent| *absent));
}

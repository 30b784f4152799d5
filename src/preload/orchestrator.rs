//! Warm-up and preload orchestration
//!
//! Both operations always complete. Loader errors are logged and counted per
//! entity; one entity's failure never stops its siblings.

use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::cache::{keys, IndexValue, CHILDREN_BY_NAME, ENTITIES_BY_NAME};
use crate::engine::Cache;
use crate::error::LoaderError;
use crate::models::{
    CachedValue, EntitySummary, IndexedItem, PreloadFailure, PreloadReport, WarmUpReport,
};
use crate::preload::EntityLoader;

impl Cache {
    // == Warm Up ==
    /// Caches the detail of the first few listed entities.
    ///
    /// Fetches run one after another; a failed fetch is logged and skipped.
    pub async fn warm_up<L>(&self, loader: &L) -> WarmUpReport
    where
        L: EntityLoader + ?Sized,
    {
        info!("Warming up cache...");
        let mut report = WarmUpReport::default();

        let entities = match loader.list_entities(true).await {
            Ok(entities) => entities,
            Err(err) => {
                warn!("Could not list entities for warm-up: {}", err);
                return report;
            }
        };
        debug!("Found {} entities for warm-up", entities.len());

        for summary in entities.iter().take(self.warm_up_limit) {
            match loader.fetch_entity(&summary.id).await {
                Ok(detail) => {
                    self.set(keys::entity(&summary.id), CachedValue::Entity(detail), None);
                    report.cached += 1;
                    debug!("Cached entity '{}'", summary.id);
                }
                Err(err) => {
                    report.failed += 1;
                    warn!("Failed to cache entity '{}': {}", summary.id, err);
                }
            }
        }

        info!(
            "Cache warm-up completed: {} cached, {} failed",
            report.cached, report.failed
        );
        report
    }

    // == Preload All ==
    /// Caches every listed entity with its children and fills the name indexes.
    ///
    /// Up to `preload_concurrency` entities are fetched at once. When all tasks
    /// have finished, the report is stored under the preload marker key with
    /// the preload marker TTL and returned.
    pub async fn preload_all<L>(&self, loader: &L) -> PreloadReport
    where
        L: EntityLoader + ?Sized,
    {
        info!("Starting cache preload");
        let started = Instant::now();

        let entities = match loader.list_entities(true).await {
            Ok(entities) => entities,
            Err(err) => {
                error!("Could not list entities for preload: {}", err);
                Vec::new()
            }
        };

        if !entities.is_empty() {
            self.set(
                keys::ENTITY_LIST,
                CachedValue::EntityList(entities.clone()),
                None,
            );
        }

        // Outcomes arrive in completion order; each carries its own summary
        let outcomes: Vec<(EntitySummary, Result<usize, LoaderError>)> = stream::iter(entities)
            .map(|summary| async move {
                let outcome = self.preload_entity(loader, &summary).await;
                (summary, outcome)
            })
            .buffer_unordered(self.preload_concurrency)
            .collect()
            .await;

        let mut report = PreloadReport::default();
        for (summary, outcome) in outcomes {
            match outcome {
                Ok(child_count) => {
                    report.successful += 1;
                    debug!(
                        "Preloaded entity '{}' with {} children",
                        summary.id, child_count
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    warn!("Failed to preload entity '{}': {}", summary.id, err);
                    report.failures.push(PreloadFailure {
                        entity_id: summary.id,
                        error: err.to_string(),
                    });
                }
            }
        }

        report.entities_preloaded = report.successful;
        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        report.completed_at = Utc::now();

        info!(
            "Cache preload completed: {} successful, {} failed in {}ms",
            report.successful, report.failed, report.duration_ms
        );

        self.set(
            keys::PRELOAD_MARKER,
            CachedValue::PreloadMarker(report.clone()),
            Some(self.preload_marker_ttl),
        );
        report
    }

    /// Fetches, stores and indexes one entity. Returns its child count.
    async fn preload_entity<L>(
        &self,
        loader: &L,
        summary: &EntitySummary,
    ) -> Result<usize, LoaderError>
    where
        L: EntityLoader + ?Sized,
    {
        let (detail, children) = futures::try_join!(
            loader.fetch_entity(&summary.id),
            loader.fetch_children(&summary.id)
        )?;

        self.update_index(
            ENTITIES_BY_NAME,
            &summary.name,
            IndexValue::One(IndexedItem::Entity(summary.clone())),
        );
        for child in &children {
            self.update_index(
                CHILDREN_BY_NAME,
                &child.name,
                IndexValue::One(IndexedItem::Child(child.with_parent(&summary.id))),
            );
        }

        let child_count = children.len();
        self.set(keys::entity(&summary.id), CachedValue::Entity(detail), None);
        self.set(keys::children(&summary.id), CachedValue::Children(children), None);
        Ok(child_count)
    }
}

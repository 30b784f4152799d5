//! Warm Cache - standalone runner
//!
//! Builds the cache from the environment, restores the last snapshot,
//! preloads it from a JSON dataset and keeps it swept until shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warm_cache::cache::CacheSnapshot;
use warm_cache::models::CachedValue;
use warm_cache::{spawn_sweeper, Cache, Config, JsonFileLoader};

/// Main entry point for the cache runner.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and import the snapshot, if any
/// 4. Start the background expiration sweeper
/// 5. Warm up, then preload in the background, from the dataset file
/// 6. On SIGINT/SIGTERM stop the sweeper and export the snapshot
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warm_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Warm Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_ttl={:?}, sweep_interval={:?}",
        config.max_entries, config.default_ttl, config.sweep_interval
    );

    let cache = Arc::new(Cache::new(&config).context("invalid cache configuration")?);

    if let Some(path) = &config.snapshot_file {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            match CacheSnapshot::<CachedValue>::load(path).await {
                Ok(snapshot) => {
                    let imported = cache.import(snapshot);
                    info!("Imported {} entries from {}", imported, path.display());
                }
                Err(err) => warn!("Ignoring unreadable snapshot {}: {}", path.display(), err),
            }
        }
    }

    let sweeper = spawn_sweeper(cache.clone(), config.sweep_interval);

    let preload = match &config.data_file {
        Some(path) => {
            let loader = Arc::new(
                JsonFileLoader::open(path)
                    .await
                    .with_context(|| format!("failed to read dataset {}", path.display()))?,
            );
            info!("Loaded {} entities from {}", loader.len(), path.display());

            cache.warm_up(loader.as_ref()).await;

            let cache = cache.clone();
            Some(tokio::spawn(async move {
                cache.preload_all(loader.as_ref()).await
            }))
        }
        None => {
            info!("No data file configured, skipping warm-up and preload");
            None
        }
    };

    shutdown_signal().await?;

    if let Some(task) = preload {
        if !task.is_finished() {
            warn!("Preload still running at shutdown, aborting it");
        }
        task.abort();
    }
    sweeper.shutdown().await;

    let stats = cache.stats();
    info!(
        "Final stats: size={}, hits={}, misses={}, hit_rate={}, memory={}",
        stats.size, stats.hits, stats.misses, stats.hit_rate, stats.memory_usage
    );

    if let Some(path) = &config.snapshot_file {
        let snapshot = cache.export();
        snapshot
            .save(path)
            .await
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!("Exported {} entries to {}", snapshot.len(), path.display());
    }

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("failed to install Ctrl+C handler")?;
                info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .context("failed to install Ctrl+C handler")?;
        info!("Received Ctrl+C, initiating shutdown...");
    }

    Ok(())
}

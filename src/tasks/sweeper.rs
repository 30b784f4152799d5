//! Expiration Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::engine::Cache;

/// Handle to a running sweeper.
///
/// Dropping the handle also stops the task right away.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to exit.
    pub async fn shutdown(self) {
        // A send error means the task already exited
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!("Sweeper task ended abnormally: {}", err);
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The first sweep runs one full `interval` after spawning. Sweeps do not
/// touch hit/miss statistics.
///
/// # Arguments
/// * `cache` - Shared handle to the cache
/// * `interval` - Time between sweeps, independent of any entry's TTL
///
/// # Returns
/// A [`SweeperHandle`] used to stop the task during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Cache::new(&Config::default())?);
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweeper(cache: Arc<Cache>, interval: Duration) -> SweeperHandle {
    // tokio intervals panic on a zero period
    let period = interval.max(Duration::from_millis(1));
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Starting expiration sweeper with interval of {:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.purge_expired();
                    if removed > 0 {
                        info!("Expiration sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Expiration sweep: no expired entries found");
                    }
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Expiration sweeper stopped");
    });

    SweeperHandle { shutdown, task }
}

//! Periodic, unconditional cache invalidation.
//!
//! The schedule does not look at freshness: every `period` it clears whatever
//! is cached and lets the next reader reload it.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// Something whose cached state can be dropped on a schedule.
#[async_trait::async_trait]
pub trait Invalidate: Send + Sync {
    async fn invalidate(&self);
}

/// Spawns a task that calls `target.invalidate()` every `period`.
///
/// The first invalidation happens one full period after spawning. Abort the
/// returned handle to stop the schedule.
pub fn spawn_invalidation_task(target: Arc<dyn Invalidate>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_secs = period.as_secs(), "cache invalidation schedule started");
        loop {
            ticker.tick().await;
            target.invalidate().await;
        }
    })
}

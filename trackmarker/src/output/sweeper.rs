//! Periodic eviction of vehicles that stopped reporting.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::train_state::TrainStateStore;

/// Spawn the sweeper task: every `interval`, evict entries older than `max_age`.
///
/// The store's clock supplies `now`, so tests drive staleness by moving a
/// manual clock rather than waiting.
pub fn spawn_sweeper(
    store: Arc<TrainStateStore>,
    max_age: Duration,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // A zero period would panic
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(max_age_secs = max_age.as_secs(), interval_ms = interval.as_millis() as u64, "Sweeper started");

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = ticker.tick() => {
                    store.evict(store.now(), max_age);
                }
            }
        }

        tracing::info!("Sweeper stopped");
    })
}

//! Persistence sink: rewrites the published train files on every state change.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::OutputError;
use super::trains::{write_trains_geojson, write_trains_json};
use crate::train_state::TrainStateStore;

/// Where the live train files go.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutputPaths {
    pub json: PathBuf,
    pub geojson: PathBuf,
}

/// Write both train files from the store's current snapshot.
pub fn publish_snapshot(store: &TrainStateStore, paths: &TrainOutputPaths) -> Result<(), OutputError> {
    let snapshot = store.snapshot();
    write_trains_json(&paths.json, &snapshot)?;
    write_trains_geojson(&paths.geojson, &snapshot)?;
    tracing::trace!(vehicles = snapshot.len(), "Train files published");
    Ok(())
}

/// Spawn the sink task.
///
/// Writes once at start so the files exist, then after every batch of state
/// events. Events already queued are folded into one write. Write failures
/// are logged and the sink keeps running. A final write happens on shutdown.
pub fn spawn_state_sink(
    store: Arc<TrainStateStore>,
    paths: TrainOutputPaths,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut events = store.subscribe();

    tokio::spawn(async move {
        tracing::info!(json = %paths.json.display(), geojson = %paths.geojson.display(), "State sink started");
        publish(&store, &paths).await;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                event = events.recv() => {
                    match event {
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "State sink lagged, writing latest snapshot");
                        }
                        Err(RecvError::Closed) => break,
                    }
                    // Drain whatever else is queued; one snapshot covers it all
                    while events.try_recv().is_ok() {}
                    publish(&store, &paths).await;
                }
            }
        }

        publish(&store, &paths).await;
        tracing::info!("State sink stopped");
    })
}

async fn publish(store: &Arc<TrainStateStore>, paths: &TrainOutputPaths) {
    let store = Arc::clone(store);
    let paths = paths.clone();
    let result = tokio::task::spawn_blocking(move || publish_snapshot(&store, &paths))
        .await
        .map_err(|e| OutputError::Task(e.to_string()))
        .and_then(|r| r);

    if let Err(e) = result {
        tracing::warn!(error = %e, "Failed to publish train state");
    }
}

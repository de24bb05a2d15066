//! Tracker startup and shutdown.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::config::ConfigFile;
use crate::ingest::{run_ingest, IngestError, IngestStats};
use crate::network::TrackNetwork;
use crate::output::{spawn_state_sink, spawn_sweeper};
use crate::train_state::{Clock, SystemClock, TrainStateStore};

/// Load the network named by the config file.
pub fn load_network(config: &ConfigFile) -> Result<TrackNetwork, AppError> {
    let network = TrackNetwork::load_gpx(
        &config.network.track_file,
        &config.offsets_map(),
        config.network.scale(),
    )?;
    Ok(network)
}

/// The running tracker: feed, ingest, sweeper and sink tasks around one store.
///
/// All tasks share a cancellation token. The feed ending (EOF on stdin, or
/// giving up on TCP) lets ingest drain and then stops the rest.
pub struct TrackerApp {
    store: Arc<TrainStateStore>,
    cancel: CancellationToken,
    feed: JoinHandle<Result<(), IngestError>>,
    ingest: JoinHandle<IngestStats>,
    sweeper: JoinHandle<()>,
    sink: JoinHandle<()>,
}

impl TrackerApp {
    /// Start all tasks on the current runtime using the system clock.
    pub async fn start(config: AppConfig, network: Arc<TrackNetwork>) -> Result<Self, AppError> {
        Self::start_with_clock(config, network, Arc::new(SystemClock)).await
    }

    /// Start with an explicit clock.
    pub async fn start_with_clock(
        config: AppConfig,
        network: Arc<TrackNetwork>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        info!(
            tracks = network.tracks().len(),
            stops = network.stops().len(),
            namespace = %config.namespace,
            "Starting tracker"
        );

        let store = Arc::new(TrainStateStore::new(network, clock));
        let cancel = CancellationToken::new();

        // Subscribe before anything can publish
        let sink = spawn_state_sink(Arc::clone(&store), config.outputs.clone(), cancel.child_token());
        let sweeper = spawn_sweeper(
            Arc::clone(&store),
            config.max_age,
            config.sweep_interval,
            cancel.child_token(),
        );

        let (tx, rx) = mpsc::channel(config.line_channel_capacity.max(1));
        let ingest = tokio::spawn(run_ingest(
            rx,
            Arc::clone(&store),
            config.namespace.clone(),
            cancel.child_token(),
        ));
        let feed = config.feed.spawn(tx, cancel.child_token());

        Ok(Self {
            store,
            cancel,
            feed,
            ingest,
            sweeper,
            sink,
        })
    }

    /// The live store.
    pub fn store(&self) -> &Arc<TrainStateStore> {
        &self.store
    }

    /// Token that stops every task when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until the feed ends or the token is cancelled, then stop all tasks.
    pub async fn wait(self) -> Result<IngestStats, AppError> {
        let feed_result = self.feed.await;
        // Channel is closed now; ingest drains what is queued
        let stats = self.ingest.await;

        self.cancel.cancel();
        let sweeper = self.sweeper.await;
        let sink = self.sink.await;

        feed_result??;
        sweeper?;
        sink?;
        let stats = stats?;

        info!(applied = stats.applied, vehicles = self.store.len(), "Tracker stopped");
        Ok(stats)
    }

    /// Cancel all tasks and wait for them.
    pub async fn shutdown(self) -> Result<IngestStats, AppError> {
        info!("Shutting down tracker");
        self.cancel.cancel();
        self.wait().await
    }
}

//! Runtime configuration for [`TrackerApp`](super::TrackerApp).

use std::time::Duration;

use crate::config::{ConfigFile, IngestSource};
use crate::ingest::{FixFeed, TcpFeed};
use crate::output::TrainOutputPaths;

/// Default capacity of the feed → ingest line channel.
pub const DEFAULT_LINE_CHANNEL_CAPACITY: usize = 1024;

/// Everything the running tracker needs besides the network.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FixFeed,
    /// First topic level of accepted messages.
    pub namespace: String,
    pub max_age: Duration,
    pub sweep_interval: Duration,
    pub outputs: TrainOutputPaths,
    pub line_channel_capacity: usize,
}

impl AppConfig {
    /// Translate the config file into runtime settings.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let feed = match config.ingest.source {
            IngestSource::Tcp => FixFeed::Tcp(TcpFeed::new(config.ingest.address.clone())),
            IngestSource::Stdin => FixFeed::Stdin,
        };

        Self {
            feed,
            namespace: config.ingest.namespace.clone(),
            max_age: config.state.max_age(),
            sweep_interval: config.state.sweep_interval(),
            outputs: TrainOutputPaths {
                json: config.output.trains_json.clone(),
                geojson: config.output.trains_geojson.clone(),
            },
            line_channel_capacity: DEFAULT_LINE_CHANNEL_CAPACITY,
        }
    }

    /// Replace the feed.
    pub fn with_feed(mut self, feed: FixFeed) -> Self {
        self.feed = feed;
        self
    }
}

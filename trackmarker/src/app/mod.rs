//! Application lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────── TrackerApp ─────────────────────────────┐
//! │                                                                      │
//! │  FixFeed ──lines──► run_ingest ──upsert──► TrainStateStore           │
//! │                                               │        ▲             │
//! │                                     StateEvent│        │evict        │
//! │                                               ▼        │             │
//! │                                         state sink   sweeper        │
//! │                                    (trains.json/.geojson)            │
//! │                                                                      │
//! │  one CancellationToken, child tokens per task                       │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let network = Arc::new(load_network(&config_file)?);
//! let app = TrackerApp::start(AppConfig::from_config_file(&config_file), network).await?;
//! let stats = app.wait().await?;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{load_network, TrackerApp};
pub use config::{AppConfig, DEFAULT_LINE_CHANNEL_CAPACITY};
pub use error::AppError;

//! Trackmarker - live train positions on a rail network
//!
//! Map-matches GPS fixes from vehicles onto a GPX-defined track network,
//! derives mileage (trackmarker), heading, next stop and arrival estimate,
//! and publishes the live state as JSON and GeoJSON files.
//!
//! Leaf modules first: [`coord`] → [`network`] → [`matching`] →
//! [`train_state`] → [`ingest`] / [`output`] → [`app`].

pub mod app;
pub mod config;
pub mod coord;
pub mod ingest;
pub mod logging;
pub mod matching;
pub mod network;
pub mod output;
pub mod train_state;

/// Crate version, for banners and startup logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

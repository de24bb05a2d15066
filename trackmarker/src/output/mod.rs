//! Published files.
//!
//! Live state (`trains.json`, `trains.geojson`) is rewritten by the sink task
//! after each store change. The static network exports (`tracks.json`,
//! `tracks.geojson`, station table) are written once on demand. Every file is
//! replaced atomically.

mod atomic;
mod error;
mod sink;
mod sweeper;
mod tracks;
mod trains;

pub use atomic::write_atomic;
pub use error::OutputError;
pub use sink::{publish_snapshot, spawn_state_sink, TrainOutputPaths};
pub use sweeper::spawn_sweeper;
pub use tracks::{
    station_table, tracks_document, tracks_feature_collection, write_station_table,
    write_tracks_geojson, write_tracks_json,
};
pub use trains::{
    trains_document, trains_feature_collection, write_trains_geojson, write_trains_json,
};

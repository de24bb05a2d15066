//! Default configuration values.

/// Track file, relative to the working directory.
pub const DEFAULT_TRACK_FILE: &str = "trainlines.gpx";

/// Where the fix feed connects by default.
pub const DEFAULT_INGEST_ADDRESS: &str = "127.0.0.1:1884";

/// First topic level of the vehicle feed.
pub const DEFAULT_NAMESPACE: &str = "c3toc";

/// Vehicles without a fix for this long are dropped (10 minutes).
pub const DEFAULT_MAX_AGE_SECS: u64 = 600;

/// How often stale vehicles are swept.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 1;

pub const DEFAULT_TRAINS_JSON: &str = "webroot/trains.json";
pub const DEFAULT_TRAINS_GEOJSON: &str = "webroot/trains.geojson";
pub const DEFAULT_TRACKS_JSON: &str = "webroot/tracks.json";
pub const DEFAULT_TRACKS_GEOJSON: &str = "webroot/tracks.geojson";
pub const DEFAULT_STATION_TABLE: &str = "webroot/stations.txt";

//! Typed configuration sections.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::defaults::*;
use crate::coord::{LocalScale, DEFAULT_METERS_PER_DEGREE_LAT, DEFAULT_METERS_PER_DEGREE_LON};
use crate::logging::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};

/// Contents of `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub network: NetworkSettings,
    /// Trackmarker of each track's first point, by track name.
    pub offsets: BTreeMap<String, f64>,
    pub ingest: IngestSettings,
    pub state: StateSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Track offsets in the form the network builder takes.
    pub fn offsets_map(&self) -> HashMap<String, f64> {
        self.offsets.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

/// `[network]`
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    pub track_file: PathBuf,
    pub meters_per_degree_lat: f64,
    pub meters_per_degree_lon: f64,
}

impl NetworkSettings {
    pub fn scale(&self) -> LocalScale {
        LocalScale::new(self.meters_per_degree_lat, self.meters_per_degree_lon)
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            track_file: PathBuf::from(DEFAULT_TRACK_FILE),
            meters_per_degree_lat: DEFAULT_METERS_PER_DEGREE_LAT,
            meters_per_degree_lon: DEFAULT_METERS_PER_DEGREE_LON,
        }
    }
}

/// Where fixes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestSource {
    /// Line feed over TCP, reconnecting on loss.
    #[default]
    Tcp,
    /// Line feed on standard input, ends at EOF.
    Stdin,
}

impl FromStr for IngestSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "stdin" => Ok(Self::Stdin),
            other => Err(format!("unknown ingest source '{}'", other)),
        }
    }
}

impl fmt::Display for IngestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::Stdin => f.write_str("stdin"),
        }
    }
}

/// `[ingest]`
#[derive(Debug, Clone, PartialEq)]
pub struct IngestSettings {
    pub source: IngestSource,
    pub address: String,
    pub namespace: String,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            source: IngestSource::default(),
            address: DEFAULT_INGEST_ADDRESS.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// `[state]`
#[derive(Debug, Clone, PartialEq)]
pub struct StateSettings {
    pub max_age_secs: u64,
    pub sweep_interval_secs: u64,
}

impl StateSettings {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub trains_json: PathBuf,
    pub trains_geojson: PathBuf,
    pub tracks_json: PathBuf,
    pub tracks_geojson: PathBuf,
    pub station_table: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            trains_json: PathBuf::from(DEFAULT_TRAINS_JSON),
            trains_geojson: PathBuf::from(DEFAULT_TRAINS_GEOJSON),
            tracks_json: PathBuf::from(DEFAULT_TRACKS_JSON),
            tracks_geojson: PathBuf::from(DEFAULT_TRACKS_GEOJSON),
            station_table: PathBuf::from(DEFAULT_STATION_TABLE),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

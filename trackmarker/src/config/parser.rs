//! INI parsing: `Ini` → [`ConfigFile`].
//!
//! The only place where INI key names are mapped to struct fields. Missing
//! sections and keys keep their defaults.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::{ConfigFile, IngestSource};

/// Overlay the values found in `ini` on the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("network")) {
        if let Some(v) = non_empty(section, "track_file") {
            config.network.track_file = expand_tilde(v);
        }
        if let Some(v) = section.get("meters_per_degree_lat") {
            config.network.meters_per_degree_lat = parse_positive("network", "meters_per_degree_lat", v)?;
        }
        if let Some(v) = section.get("meters_per_degree_lon") {
            config.network.meters_per_degree_lon = parse_positive("network", "meters_per_degree_lon", v)?;
        }
    }

    if let Some(section) = ini.section(Some("offsets")) {
        for (track, v) in section.iter() {
            let start: f64 = parse_value("offsets", track, v, "must be a number of meters")?;
            if !start.is_finite() {
                return Err(invalid("offsets", track, v, "must be a finite number of meters"));
            }
            config.offsets.insert(track.trim().to_string(), start);
        }
    }

    if let Some(section) = ini.section(Some("ingest")) {
        if let Some(v) = section.get("source") {
            config.ingest.source = IngestSource::from_str(v)
                .map_err(|_| invalid("ingest", "source", v, "must be 'tcp' or 'stdin'"))?;
        }
        if let Some(v) = non_empty(section, "address") {
            config.ingest.address = v.to_string();
        }
        if let Some(v) = non_empty(section, "namespace") {
            if v.contains('/') {
                return Err(invalid("ingest", "namespace", v, "must be a single topic level"));
            }
            config.ingest.namespace = v.to_string();
        }
    }

    if let Some(section) = ini.section(Some("state")) {
        if let Some(v) = section.get("max_age_secs") {
            config.state.max_age_secs = parse_seconds("state", "max_age_secs", v)?;
        }
        if let Some(v) = section.get("sweep_interval_secs") {
            config.state.sweep_interval_secs = parse_seconds("state", "sweep_interval_secs", v)?;
        }
    }

    if let Some(section) = ini.section(Some("output")) {
        let output = &mut config.output;
        for (key, target) in [
            ("trains_json", &mut output.trains_json),
            ("trains_geojson", &mut output.trains_geojson),
            ("tracks_json", &mut output.tracks_json),
            ("tracks_geojson", &mut output.tracks_geojson),
            ("station_table", &mut output.station_table),
        ] {
            if let Some(v) = non_empty(section, key) {
                *target = expand_tilde(v);
            }
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(section: &str, key: &str, value: &str, reason: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    let reason = "must be a positive number";
    let parsed: f64 = parse_value(section, key, value, reason)?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err(invalid(section, key, value, reason))
    }
}

fn parse_seconds(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    let reason = "must be a positive integer (seconds)";
    match parse_value(section, key, value, reason)? {
        0 => Err(invalid(section, key, value, reason)),
        secs => Ok(secs),
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

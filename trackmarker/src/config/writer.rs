//! Serialization: [`ConfigFile`] → commented INI text.

use std::fmt::Write;
use std::path::Path;

use super::settings::ConfigFile;

/// Render the configuration as the commented INI written by `init`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let mut out = format!(
        r#"[network]
; GPX file with one named <trk> per line; labelled points become waypoints
track_file = {}
; Local flat-earth calibration, meters per degree
meters_per_degree_lat = {}
meters_per_degree_lon = {}

[offsets]
; Trackmarker (meters) of each track's first point, e.g.
; Marschbahn = 1704
"#,
        path_to_string(&config.network.track_file),
        config.network.meters_per_degree_lat,
        config.network.meters_per_degree_lon,
    );

    for (track, start) in &config.offsets {
        // Infallible for String
        let _ = writeln!(out, "{} = {}", track, start);
    }

    let _ = write!(
        out,
        r#"
[ingest]
; tcp   - connect to address and read '<topic> <json>' lines, reconnecting on loss
; stdin - read the same lines from standard input
source = {}
address = {}
; Topics look like <namespace>/train/<vehicle>/pos
namespace = {}

[state]
; Drop vehicles without a fix for this many seconds
max_age_secs = {}
sweep_interval_secs = {}

[output]
trains_json = {}
trains_geojson = {}
tracks_json = {}
tracks_geojson = {}
station_table = {}

[logging]
directory = {}
file = {}
"#,
        config.ingest.source,
        config.ingest.address,
        config.ingest.namespace,
        config.state.max_age_secs,
        config.state.sweep_interval_secs,
        path_to_string(&config.output.trains_json),
        path_to_string(&config.output.trains_geojson),
        path_to_string(&config.output.tracks_json),
        path_to_string(&config.output.tracks_geojson),
        path_to_string(&config.output.station_table),
        path_to_string(&config.logging.directory),
        config.logging.file,
    );

    out
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

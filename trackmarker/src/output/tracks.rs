//! Static network exports: `tracks.json`, `tracks.geojson` and the DokuWiki
//! station table.

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{json, Map};

use super::atomic::write_atomic;
use super::error::OutputError;
use super::trains::write_json;
use crate::network::{TrackNetwork, Waypoint, WaypointKind};

/// `{"tracks": {name: track}, "waypoints": {trackmarker: waypoint}}`.
pub fn tracks_document(network: &TrackNetwork) -> Result<serde_json::Value, OutputError> {
    let serialize = |what, result: Result<serde_json::Value, serde_json::Error>| {
        result.map_err(|source| OutputError::Serialize { what, source })
    };

    let mut tracks = Map::new();
    for track in network.tracks() {
        tracks.insert(track.name.clone(), serialize("track", serde_json::to_value(track))?);
    }
    let waypoints = serialize("waypoints", serde_json::to_value(network.waypoints()))?;

    Ok(json!({ "tracks": tracks, "waypoints": waypoints }))
}

/// Map symbol and colour for a waypoint kind.
fn marker_style(kind: WaypointKind) -> Option<(&'static str, &'static str)> {
    match kind {
        WaypointKind::Station | WaypointKind::Stop => Some(("rail", "#008")),
        WaypointKind::LevelCrossing => Some(("fence", "#880")),
        WaypointKind::Turnout => Some(("cross", "#080")),
        WaypointKind::Generic => None,
    }
}

fn waypoint_feature(waypoint: &Waypoint) -> Feature {
    let mut properties = Map::new();
    properties.insert(
        "description".to_string(),
        json!(format!("{} {}", waypoint.kind, waypoint.name)),
    );
    properties.insert("name".to_string(), json!(waypoint.name));
    properties.insert("title".to_string(), json!(waypoint.name));
    properties.insert("type".to_string(), json!(waypoint.kind));
    if waypoint.is_stop() {
        properties.insert("ds100".to_string(), json!(waypoint.station_code));
    }
    if let Some((symbol, color)) = marker_style(waypoint.kind) {
        properties.insert("marker-symbol".to_string(), json!(symbol));
        properties.insert("marker-color".to_string(), json!(color));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![waypoint.lon, waypoint.lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Red line per track followed by a point per waypoint.
pub fn tracks_feature_collection(network: &TrackNetwork) -> FeatureCollection {
    let lines = network.tracks().iter().map(|track| {
        let coords = track.points.iter().map(|p| vec![p.lon, p.lat]).collect();
        let mut properties = Map::new();
        properties.insert("name".to_string(), json!(track.name));
        properties.insert("title".to_string(), json!(track.name));
        properties.insert("stroke".to_string(), json!("#ff0000"));
        properties.insert("stroke-width".to_string(), json!(4));

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(coords))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    });

    let points = network.waypoints().values().map(waypoint_feature);

    FeatureCollection {
        bbox: None,
        features: lines.chain(points).collect(),
        foreign_members: None,
    }
}

/// DokuWiki table of stops and stations, ascending by kilometre.
pub fn station_table(network: &TrackNetwork) -> String {
    let mut table = String::from("^ DS100 ^ km    ^ Name                 ^\n");
    for stop in network.stops() {
        table.push_str(&format!(
            "| {:5} | {:.3} | {:20} |\n",
            stop.station_code.as_deref().unwrap_or(""),
            stop.trackmarker as f64 / 1000.0,
            stop.name
        ));
    }
    table
}

/// Atomically write `tracks.json`.
pub fn write_tracks_json(path: &Path, network: &TrackNetwork) -> Result<(), OutputError> {
    write_json(path, &tracks_document(network)?)
}

/// Atomically write `tracks.geojson`.
pub fn write_tracks_geojson(path: &Path, network: &TrackNetwork) -> Result<(), OutputError> {
    let document = serde_json::to_value(tracks_feature_collection(network)).map_err(|source| {
        OutputError::Serialize {
            what: "track features",
            source,
        }
    })?;
    write_json(path, &document)
}

/// Atomically write the station table.
pub fn write_station_table(path: &Path, network: &TrackNetwork) -> Result<(), OutputError> {
    let table = station_table(network);
    write_atomic(path, |w| w.write_all(table.as_bytes()))
}

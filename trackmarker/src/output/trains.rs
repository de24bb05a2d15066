//! Published train state: `trains.json` and `trains.geojson`.

use std::collections::BTreeMap;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{json, Map};

use super::atomic::write_atomic;
use super::error::OutputError;
use crate::train_state::EnrichedRecord;

/// Maki icon used for vehicles (no locomotive in the set).
const TRAIN_MARKER_SYMBOL: &str = "rocket";
const TRAIN_MARKER_COLOR: &str = "#cc0";

/// `{"trains": {vehicle: record}}` with all object keys sorted.
pub fn trains_document(trains: &BTreeMap<String, EnrichedRecord>) -> Result<serde_json::Value, OutputError> {
    let trains = serde_json::to_value(trains).map_err(|source| OutputError::Serialize {
        what: "trains",
        source,
    })?;
    Ok(json!({ "trains": trains }))
}

/// One point feature per vehicle carrying the record plus display metadata.
pub fn trains_feature_collection(
    trains: &BTreeMap<String, EnrichedRecord>,
) -> Result<FeatureCollection, OutputError> {
    let mut features = Vec::with_capacity(trains.len());

    for (name, record) in trains {
        let mut properties = match serde_json::to_value(record) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(source) => {
                return Err(OutputError::Serialize {
                    what: "train record",
                    source,
                })
            }
        };
        properties.insert("marker-symbol".to_string(), json!(TRAIN_MARKER_SYMBOL));
        properties.insert("marker-color".to_string(), json!(TRAIN_MARKER_COLOR));
        properties.insert("name".to_string(), json!(name));

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![record.lon, record.lat]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Atomically write `trains.json`.
pub fn write_trains_json(path: &Path, trains: &BTreeMap<String, EnrichedRecord>) -> Result<(), OutputError> {
    let document = trains_document(trains)?;
    write_json(path, &document)
}

/// Atomically write `trains.geojson`.
pub fn write_trains_geojson(
    path: &Path,
    trains: &BTreeMap<String, EnrichedRecord>,
) -> Result<(), OutputError> {
    let collection = trains_feature_collection(trains)?;
    let document = serde_json::to_value(&collection).map_err(|source| OutputError::Serialize {
        what: "train features",
        source,
    })?;
    write_json(path, &document)
}

/// Pretty-print a JSON value through [`write_atomic`].
///
/// `serde_json::Value` objects are ordered maps, so keys come out sorted.
pub(crate) fn write_json(path: &Path, document: &serde_json::Value) -> Result<(), OutputError> {
    write_atomic(path, |w| {
        serde_json::to_writer_pretty(&mut *w, document)?;
        w.write_all(b"\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(lat: f64, lon: f64) -> EnrichedRecord {
        EnrichedRecord {
            lat,
            lon,
            speed: 36.0,
            sat: Some(12),
            timestamp: Utc.with_ymd_and_hms(2024, 12, 27, 12, 0, 0).unwrap().fixed_offset(),
            trackmarker: 166,
            trackname: "Main".to_string(),
            dir: 0,
            next_stop: None,
        }
    }

    fn fleet() -> BTreeMap<String, EnrichedRecord> {
        BTreeMap::from([
            ("demo".to_string(), record(0.0015, 0.0)),
            ("ziegelei".to_string(), record(53.03, 13.3)),
        ])
    }

    #[test]
    fn test_document_wraps_trains() {
        let doc = trains_document(&fleet()).unwrap();
        assert_eq!(doc["trains"]["demo"]["trackmarker"], 166);
        assert_eq!(doc["trains"]["ziegelei"]["lat"], 53.03);
    }

    #[test]
    fn test_empty_fleet() {
        let doc = trains_document(&BTreeMap::new()).unwrap();
        assert_eq!(doc, json!({"trains": {}}));
    }

    #[test]
    fn test_features_carry_marker_metadata() {
        let collection = trains_feature_collection(&fleet()).unwrap();
        assert_eq!(collection.features.len(), 2);

        let feature = &collection.features[1];
        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["name"], "ziegelei");
        assert_eq!(props["marker-symbol"], "rocket");
        assert_eq!(props["marker-color"], "#cc0");
        assert_eq!(props["trackname"], "Main");

        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![13.3, 53.03]),
            other => panic!("expected point, got {:?}", other),
        }
    }

    #[test]
    fn test_files_are_written() {
        let temp = tempfile::tempdir().unwrap();
        let json_path = temp.path().join("trains.json");
        let geojson_path = temp.path().join("trains.geojson");

        write_trains_json(&json_path, &fleet()).unwrap();
        write_trains_geojson(&geojson_path, &fleet()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(written["trains"]["demo"]["trackname"], "Main");

        let text = std::fs::read_to_string(&geojson_path).unwrap();
        let parsed: geojson::GeoJson = text.parse().unwrap();
        assert!(matches!(parsed, geojson::GeoJson::FeatureCollection(ref fc) if fc.features.len() == 2));
    }
}

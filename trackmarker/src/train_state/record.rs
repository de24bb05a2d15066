//! Enriched per-vehicle records.
//!
//! Field names follow the published `trains.json` format consumed by the map
//! frontend, hence `trackname`, `dir` and the `type` key on the next stop.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;
use crate::network::{Waypoint, WaypointKind};

/// The stop a vehicle is heading for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStop {
    /// Estimated arrival; `null` while the vehicle is not moving.
    pub eta: Option<DateTime<Utc>>,
    pub name: String,
    pub trackmarker: i64,
    #[serde(rename = "type")]
    pub kind: WaypointKind,
}

impl NextStop {
    pub fn new(stop: &Waypoint, eta: Option<DateTime<Utc>>) -> Self {
        Self {
            eta,
            name: stop.name.clone(),
            trackmarker: stop.trackmarker,
            kind: stop.kind,
        }
    }
}

/// Latest known state of one vehicle, matched onto the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub lat: f64,
    pub lon: f64,
    /// Ground speed in km/h.
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat: Option<u32>,
    /// Fix time with the offset the vehicle reported.
    pub timestamp: DateTime<FixedOffset>,
    /// Projected position along the network in whole meters.
    pub trackmarker: i64,
    pub trackname: String,
    /// Heading in whole degrees, 0 = north.
    pub dir: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_stop: Option<NextStop>,
}

impl EnrichedRecord {
    /// Reported (unprojected) position.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_record_json_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 27, 12, 0, 0).unwrap().fixed_offset();
        let record = EnrichedRecord {
            lat: 53.0,
            lon: 13.3,
            speed: 0.0,
            sat: Some(9),
            timestamp: ts,
            trackmarker: 1704,
            trackname: "Marschbahn".to_string(),
            dir: 270,
            next_stop: Some(NextStop {
                eta: None,
                name: "Ziegeleipark".to_string(),
                trackmarker: 2100,
                kind: WaypointKind::Stop,
            }),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["trackname"], "Marschbahn");
        assert_eq!(value["dir"], 270);
        assert_eq!(value["timestamp"], "2024-12-27T12:00:00+00:00");
        assert_eq!(
            value["next_stop"],
            json!({"eta": null, "name": "Ziegeleipark", "trackmarker": 2100, "type": "Hp"})
        );
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let record = EnrichedRecord {
            lat: 0.0,
            lon: 0.0,
            speed: 1.0,
            sat: None,
            timestamp: Utc::now().fixed_offset(),
            trackmarker: 0,
            trackname: "Main".to_string(),
            dir: 0,
            next_stop: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("sat").is_none());
        assert!(value.get("next_stop").is_none());
    }
}

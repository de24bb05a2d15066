//! Tracks and the points they are made of.

use serde::Serialize;

use super::error::LoadError;
use super::waypoint::Waypoint;
use crate::coord::{distance, GeoPoint, LocalScale};

/// A sampled point along a track. Not to be confused with a turnout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    /// Cumulative meters from the track's configured origin.
    pub trackmarker: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoint: Option<Waypoint>,
}

impl TrackPoint {
    /// Position of this point.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// An ordered polyline of points with monotonically increasing mileage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    pub points: Vec<TrackPoint>,
}

impl Track {
    /// Create an empty track.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// Append a point.
    ///
    /// The first point sits at `start`; every later point adds its distance
    /// from the previous one, so `start` only matters for an empty track.
    pub(crate) fn push(
        &mut self,
        lat: f64,
        lon: f64,
        label: Option<&str>,
        start: f64,
        scale: &LocalScale,
    ) -> Result<&TrackPoint, LoadError> {
        let position = GeoPoint::new(lat, lon);
        let trackmarker = match self.points.last() {
            Some(previous) => previous.trackmarker + distance(&previous.position(), &position, scale),
            None => start,
        };

        let waypoint = match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => Some(Waypoint::from_label(lat, lon, trackmarker as i64, label)?),
            None => None,
        };

        self.points.push(TrackPoint {
            lat,
            lon,
            trackmarker,
            waypoint,
        });
        // Just pushed, so the vector is not empty
        Ok(&self.points[self.points.len() - 1])
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the track has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total mileage covered by this track (last minus first trackmarker).
    pub fn length(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.trackmarker - first.trackmarker,
            _ => 0.0,
        }
    }
}

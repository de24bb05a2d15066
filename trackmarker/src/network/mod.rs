//! Rail network model.
//!
//! The [`TrackNetwork`] is built once at startup from already-parsed track
//! sources and is immutable afterwards; share it behind an `Arc`.
//!
//! # Architecture
//!
//! ```text
//! GPX file ──► gpx::read_gpx ──► [TrackSource] ──► TrackNetwork::build
//!                                                     │
//!                                   ┌─────────────────┼─────────────────┐
//!                                   ▼                 ▼                 ▼
//!                           tracks (file order) waypoints: m→Wp   stops (sorted)
//! ```
//!
//! Waypoints are indexed by integer trackmarker across the whole network. Two
//! tracks producing the same rounded mileage collide and the one appearing
//! later in the track file wins.

mod error;
pub mod gpx;
mod track;
mod waypoint;

pub use error::LoadError;
pub use track::{Track, TrackPoint};
pub use waypoint::{Waypoint, WaypointKind};

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::coord::LocalScale;

/// A point as delivered by a track file, before mileage is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePoint {
    pub lat: f64,
    pub lon: f64,
    /// Waypoint label such as `"Bf 6010 Springfield"`.
    pub label: Option<String>,
}

impl SourcePoint {
    /// An unlabelled point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            label: None,
        }
    }

    /// A labelled point.
    pub fn labelled(lat: f64, lon: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            label: Some(label.into()),
        }
    }
}

/// One named run of points from a track file.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSource {
    pub name: String,
    pub points: Vec<SourcePoint>,
}

impl TrackSource {
    pub fn new(name: impl Into<String>, points: Vec<SourcePoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// The immutable rail network used for map matching.
#[derive(Debug, Clone)]
pub struct TrackNetwork {
    /// Tracks in the order they first appear in the source.
    tracks: Vec<Track>,
    by_name: HashMap<String, usize>,
    waypoints: BTreeMap<i64, Waypoint>,
    stops: Vec<Waypoint>,
    scale: LocalScale,
}

impl TrackNetwork {
    /// Build a network from track sources.
    ///
    /// Sources sharing a name are appended to the same track. `offsets` gives
    /// the trackmarker of each track's first point (default 0).
    ///
    /// # Errors
    ///
    /// Fails on the first label that is not a known waypoint kind.
    pub fn build<I>(
        sources: I,
        offsets: &HashMap<String, f64>,
        scale: LocalScale,
    ) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = TrackSource>,
    {
        let mut tracks: Vec<Track> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for source in sources {
            let start = offsets.get(&source.name).copied().unwrap_or(0.0);
            let index = *by_name.entry(source.name.clone()).or_insert_with(|| {
                tracks.push(Track::new(source.name.clone()));
                tracks.len() - 1
            });
            let track = &mut tracks[index];

            for point in &source.points {
                track.push(point.lat, point.lon, point.label.as_deref(), start, &scale)?;
            }
        }

        let mut waypoints = BTreeMap::new();
        for track in &tracks {
            for waypoint in track.points.iter().filter_map(|p| p.waypoint.as_ref()) {
                if let Some(previous) = waypoints.insert(waypoint.trackmarker, waypoint.clone()) {
                    tracing::debug!(
                        trackmarker = waypoint.trackmarker,
                        replaced = %previous.name,
                        by = %waypoint.name,
                        "Waypoint mileage collision"
                    );
                }
            }
        }

        // BTreeMap iteration is already ascending by trackmarker
        let stops: Vec<Waypoint> = waypoints.values().filter(|w| w.is_stop()).cloned().collect();

        tracing::info!(
            tracks = tracks.len(),
            waypoints = waypoints.len(),
            stops = stops.len(),
            "Track network built"
        );

        Ok(Self {
            tracks,
            by_name,
            waypoints,
            stops,
            scale,
        })
    }

    /// Load a GPX track file and build the network from it.
    pub fn load_gpx(
        path: &Path,
        offsets: &HashMap<String, f64>,
        scale: LocalScale,
    ) -> Result<Self, LoadError> {
        let sources = gpx::read_gpx(path)?;
        Self::build(sources, offsets, scale)
    }

    /// All tracks, in source order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Look up a track by name.
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.by_name.get(name).map(|&i| &self.tracks[i])
    }

    /// Global waypoint index keyed by trackmarker.
    pub fn waypoints(&self) -> &BTreeMap<i64, Waypoint> {
        &self.waypoints
    }

    /// Stop and station waypoints, ascending by trackmarker.
    pub fn stops(&self) -> &[Waypoint] {
        &self.stops
    }

    /// Distance calibration for this network.
    pub fn scale(&self) -> &LocalScale {
        &self.scale
    }

    /// Total number of sampled points across all tracks.
    pub fn point_count(&self) -> usize {
        self.tracks.iter().map(Track::len).sum()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Track "Main": three points 111.24 m apart going north from (0, 0),
    /// with a stop on the middle point.
    pub fn main_line() -> TrackNetwork {
        let source = TrackSource::new(
            "Main",
            vec![
                SourcePoint::new(0.0, 0.0),
                SourcePoint::labelled(0.001, 0.0, "Hp 6011 Nord"),
                SourcePoint::new(0.002, 0.0),
            ],
        );
        TrackNetwork::build([source], &HashMap::new(), LocalScale::default())
            .expect("test network builds")
    }
}

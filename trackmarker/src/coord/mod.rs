//! Coordinate primitives
//!
//! Provides the flat-earth distance and heading math used by map matching.
//!
//! The rail networks this crate serves span a few tens of kilometers, so
//! distances use a local equirectangular approximation: latitude and longitude
//! deltas are scaled to meters independently by a [`LocalScale`] calibrated for
//! the deployment's latitude band, then combined with the Euclidean norm.

mod types;

pub use types::{GeoPoint, LocalScale, DEFAULT_METERS_PER_DEGREE_LAT, DEFAULT_METERS_PER_DEGREE_LON};

/// Planar distance in meters between two positions.
///
/// # Arguments
///
/// * `a` - First position
/// * `b` - Second position
/// * `scale` - Meters-per-degree calibration for the network's area
#[inline]
pub fn distance(a: &GeoPoint, b: &GeoPoint, scale: &LocalScale) -> f64 {
    let dx = (b.lon - a.lon) * scale.meters_per_degree_lon;
    let dy = (b.lat - a.lat) * scale.meters_per_degree_lat;
    (dx * dx + dy * dy).sqrt()
}

/// Heading from `from` to `to` in degrees (0-360), where 0 = North, 90 = East.
///
/// Uses raw degree deltas, not scaled meters.
#[inline]
pub fn heading(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let dlat = to.lat - from.lat;
    let dlon = to.lon - from.lon;

    // atan2(dlon, dlat) gives bearing from north
    let bearing_deg = dlon.atan2(dlat).to_degrees();

    if bearing_deg < 0.0 {
        bearing_deg + 360.0
    } else {
        bearing_deg
    }
}

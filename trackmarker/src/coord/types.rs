//! Coordinate types.

use serde::{Deserialize, Serialize};

/// Meters per degree of latitude, measured at 53°N (5″ == 154.5 m).
pub const DEFAULT_METERS_PER_DEGREE_LAT: f64 = 154.5 * 720.0;

/// Meters per degree of longitude, measured at 53°N (10″ == 186.3 m).
pub const DEFAULT_METERS_PER_DEGREE_LON: f64 = 186.3 * 360.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new position.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Equirectangular calibration for a small geographic area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalScale {
    /// Meters covered by one degree of latitude.
    pub meters_per_degree_lat: f64,
    /// Meters covered by one degree of longitude at the area's latitude.
    pub meters_per_degree_lon: f64,
}

impl LocalScale {
    /// Create a scale from explicit calibration values.
    pub fn new(meters_per_degree_lat: f64, meters_per_degree_lon: f64) -> Self {
        Self {
            meters_per_degree_lat,
            meters_per_degree_lon,
        }
    }
}

impl Default for LocalScale {
    fn default() -> Self {
        Self::new(DEFAULT_METERS_PER_DEGREE_LAT, DEFAULT_METERS_PER_DEGREE_LON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_constants() {
        let scale = LocalScale::default();
        assert!((scale.meters_per_degree_lat - 111_240.0).abs() < 1e-9);
        assert!((scale.meters_per_degree_lon - 67_068.0).abs() < 1e-9);
    }

    #[test]
    fn test_geo_point_is_finite() {
        assert!(GeoPoint::new(53.0, 13.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 13.0).is_finite());
        assert!(!GeoPoint::new(53.0, f64::INFINITY).is_finite());
    }
}

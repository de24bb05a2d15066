//! Raw position fixes as reported by the vehicles.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::coord::GeoPoint;

/// A fix rejected before it reaches the network.
#[derive(Debug, Error)]
pub enum FixError {
    #[error("Fix field '{field}' is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Fix timestamp '{value}' is not an ISO-8601 date-time")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Track network has no points to match against")]
    EmptyNetwork,
}

/// One GPS report for a vehicle.
///
/// Payload keys match what the trackers publish: `lat`, `lon` and `speed`
/// (km/h) are required; `sat` and `ts` are optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawFix {
    pub lat: f64,
    pub lon: f64,
    /// Ground speed in km/h.
    pub speed: f64,
    #[serde(default, alias = "satellites")]
    pub sat: Option<u32>,
    #[serde(default, alias = "timestamp")]
    pub ts: Option<String>,
}

impl RawFix {
    /// A fix without satellite count or timestamp.
    pub fn new(lat: f64, lon: f64, speed: f64) -> Self {
        Self {
            lat,
            lon,
            speed,
            sat: None,
            ts: None,
        }
    }

    /// Builder-style timestamp.
    pub fn with_timestamp(mut self, ts: impl Into<String>) -> Self {
        self.ts = Some(ts.into());
        self
    }

    /// The reported position, if both coordinates are finite.
    pub fn position(&self) -> Result<GeoPoint, FixError> {
        finite("lat", self.lat)?;
        finite("lon", self.lon)?;
        Ok(GeoPoint::new(self.lat, self.lon))
    }

    /// The reported speed, if finite.
    pub fn speed_kmh(&self) -> Result<f64, FixError> {
        finite("speed", self.speed)
    }

    /// The reported timestamp with its original offset, or `received` when the
    /// fix carries none or an unparseable one.
    pub fn timestamp_or(&self, received: DateTime<Utc>) -> DateTime<FixedOffset> {
        let Some(ts) = self.ts.as_deref() else {
            return received.fixed_offset();
        };
        parse_timestamp(ts).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using receive time for fix");
            received.fixed_offset()
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, FixError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FixError::NonFinite { field, value })
    }
}

/// Parse an RFC 3339 timestamp, keeping its offset. Timestamps without an
/// offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, FixError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|source| FixError::Timestamp {
            value: value.to_string(),
            source,
        })
}

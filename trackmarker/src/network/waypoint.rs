//! Named features along the track: stations, stops, level crossings, turnouts.
//!
//! Waypoints come from labelled track points. The label grammar is
//! `"<kind-code> <rest>"`:
//!
//! | Code | Kind | Rest |
//! |------|------|------|
//! | `Bf` | Station (Bahnhof) | `<station code> <name>` |
//! | `Hp` | Stop (Haltepunkt) | `<station code> <name>` |
//! | `Bü` | Level crossing (Bahnübergang) | `<name>` |
//! | `W`  | Turnout (Weiche) | `<name>` |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::LoadError;

/// Kind of a waypoint.
///
/// A station is a stop with at least one turnout: trains may start, end,
/// overtake or turn there. A stop only lets trains halt. `Generic` is the
/// base kind with code `wp`; labels cannot name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaypointKind {
    #[serde(rename = "Bf")]
    Station,
    #[serde(rename = "Hp")]
    Stop,
    #[serde(rename = "Bü")]
    LevelCrossing,
    #[serde(rename = "W")]
    Turnout,
    #[serde(rename = "wp")]
    Generic,
}

impl WaypointKind {
    /// The label code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Station => "Bf",
            Self::Stop => "Hp",
            Self::LevelCrossing => "Bü",
            Self::Turnout => "W",
            Self::Generic => "wp",
        }
    }

    /// Parse a label code. `wp` is not a label code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Bf" => Some(Self::Station),
            "Hp" => Some(Self::Stop),
            "Bü" => Some(Self::LevelCrossing),
            "W" => Some(Self::Turnout),
            _ => None,
        }
    }

    /// True for kinds where trains halt for passengers.
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Station | Self::Stop)
    }

    /// Whether this kind carries a station code.
    fn has_station_code(&self) -> bool {
        self.is_stop()
    }
}

impl fmt::Display for WaypointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A named feature at a fixed network position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    /// Position along the network in whole meters.
    pub trackmarker: i64,
    #[serde(rename = "type")]
    pub kind: WaypointKind,
    /// Operator station code (e.g. DS100), stops and stations only.
    #[serde(rename = "ds100", skip_serializing_if = "Option::is_none")]
    pub station_code: Option<String>,
}

impl Waypoint {
    /// True for stations and stops.
    pub fn is_stop(&self) -> bool {
        self.kind.is_stop()
    }

    /// Build a waypoint from a track point label.
    ///
    /// # Errors
    ///
    /// `LoadError::UnknownWaypointKind` for unrecognised codes and
    /// `LoadError::InvalidLabel` when the label lacks a required part.
    pub fn from_label(lat: f64, lon: f64, trackmarker: i64, label: &str) -> Result<Self, LoadError> {
        let (code, rest) = label.split_once(' ').ok_or_else(|| LoadError::InvalidLabel {
            label: label.to_string(),
            reason: "expected '<type> <name>'".to_string(),
        })?;

        let kind = WaypointKind::from_code(code).ok_or_else(|| LoadError::UnknownWaypointKind {
            code: code.to_string(),
            label: label.to_string(),
        })?;

        let (station_code, name) = if kind.has_station_code() {
            let (station_code, name) =
                rest.split_once(' ').ok_or_else(|| LoadError::InvalidLabel {
                    label: label.to_string(),
                    reason: format!("expected '{} <station code> <name>'", code),
                })?;
            (Some(station_code.to_string()), name)
        } else {
            (None, rest)
        };

        Ok(Self {
            lat,
            lon,
            name: name.to_string(),
            trackmarker,
            kind,
            station_code,
        })
    }
}

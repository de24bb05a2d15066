//! Errors raised while building a track network.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors during network construction.
///
/// A network that fails to load is never partially served.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Waypoint label uses a kind code we don't know.
    #[error("Unknown waypoint type '{code}' in label '{label}'")]
    UnknownWaypointKind { code: String, label: String },

    /// Waypoint label doesn't follow `<code> <rest>` (or `<code> <station> <name>`).
    #[error("Malformed waypoint label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    /// Track file could not be read.
    #[error("Failed to read track file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Track file is not valid GPX.
    #[error("Invalid GPX: {0}")]
    Gpx(String),
}

impl From<roxmltree::Error> for LoadError {
    fn from(e: roxmltree::Error) -> Self {
        LoadError::Gpx(e.to_string())
    }
}

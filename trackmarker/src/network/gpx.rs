//! GPX track file reader.
//!
//! Reads `<trk>` elements into [`TrackSource`]s. Track points carry their
//! waypoint label in the `<name>` child. Unnamed tracks are skipped.

use std::path::Path;

use roxmltree::{Document, Node};

use super::error::LoadError;
use super::{SourcePoint, TrackSource};

/// Read a GPX file from disk.
pub fn read_gpx(path: &Path) -> Result<Vec<TrackSource>, LoadError> {
    let xml = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sources = parse_gpx(&xml)?;
    tracing::debug!(path = %path.display(), tracks = sources.len(), "GPX file read");
    Ok(sources)
}

/// Parse GPX text into track sources, one per `<trk>`, in document order.
pub fn parse_gpx(xml: &str) -> Result<Vec<TrackSource>, LoadError> {
    let doc = Document::parse(xml)?;
    let mut sources = Vec::new();

    for trk in doc.descendants().filter(|n| n.has_tag_name("trk")) {
        let Some(name) = child_text(trk, "name") else {
            continue;
        };

        let mut points = Vec::new();
        for seg in trk.children().filter(|n| n.has_tag_name("trkseg")) {
            for pt in seg.children().filter(|n| n.has_tag_name("trkpt")) {
                points.push(parse_point(pt)?);
            }
        }

        sources.push(TrackSource::new(name, points));
    }

    Ok(sources)
}

fn parse_point(pt: Node<'_, '_>) -> Result<SourcePoint, LoadError> {
    let lat = coordinate_attribute(pt, "lat")?;
    let lon = coordinate_attribute(pt, "lon")?;
    Ok(SourcePoint {
        lat,
        lon,
        label: child_text(pt, "name"),
    })
}

fn coordinate_attribute(pt: Node<'_, '_>, attr: &str) -> Result<f64, LoadError> {
    let raw = pt.attribute(attr).ok_or_else(|| {
        LoadError::Gpx(format!(
            "trkpt at byte {} is missing '{}'",
            pt.range().start,
            attr
        ))
    })?;
    raw.trim().parse().map_err(|_| {
        LoadError::Gpx(format!(
            "trkpt at byte {} has invalid {} '{}'",
            pt.range().start,
            attr,
            raw
        ))
    })
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Rollbahn</name>
    <trkseg>
      <trkpt lat="53.0300" lon="13.3000"><name>Bf XMZ Mildenberg</name></trkpt>
      <trkpt lat="53.0310" lon="13.3000"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="53.0320" lon="13.3010"><name>W 3</name></trkpt>
    </trkseg>
  </trk>
  <trk>
    <trkseg><trkpt lat="1" lon="1"/></trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_parse_tracks_and_labels() {
        let sources = parse_gpx(SAMPLE).unwrap();
        assert_eq!(sources.len(), 1, "unnamed track is skipped");

        let track = &sources[0];
        assert_eq!(track.name, "Rollbahn");
        assert_eq!(track.points.len(), 3, "segments are concatenated");
        assert_eq!(track.points[0].label.as_deref(), Some("Bf XMZ Mildenberg"));
        assert_eq!(track.points[1].label, None);
        assert_eq!(track.points[2].lon, 13.301);
    }

    #[test]
    fn test_missing_coordinate_is_error() {
        let xml = r#"<gpx><trk><name>T</name><trkseg><trkpt lat="1"/></trkseg></trk></gpx>"#;
        assert!(matches!(parse_gpx(xml), Err(LoadError::Gpx(_))));
    }

    #[test]
    fn test_invalid_xml_is_error() {
        assert!(matches!(parse_gpx("<gpx><trk>"), Err(LoadError::Gpx(_))));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let result = read_gpx(Path::new("/nonexistent/trainlines.gpx"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}

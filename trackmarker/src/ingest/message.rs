//! Topic and payload decoding.
//!
//! Vehicles publish on `<namespace>/train/<vehicle>/<kind>`. Only `pos`
//! messages carry a fix; `status` and anything else are ignored. On the wire
//! each message is one line, `"<topic> <payload>"`, the format `mosquitto_sub
//! -v` prints.

use super::error::IngestError;
use crate::train_state::RawFix;

/// Topic kind carrying position fixes.
pub const POSITION_KIND: &str = "pos";

/// A decoded position message.
#[derive(Debug, Clone, PartialEq)]
pub struct FixMessage {
    pub vehicle_id: String,
    pub fix: RawFix,
}

/// Decode one published message.
///
/// Returns `Ok(None)` for messages that are well-formed but not fixes:
/// foreign namespaces and non-`pos` kinds.
pub fn parse_message(topic: &str, payload: &str, namespace: &str) -> Result<Option<FixMessage>, IngestError> {
    let parts: Vec<&str> = topic.split('/').collect();
    if parts.first() != Some(&namespace) {
        return Ok(None);
    }

    let (vehicle_id, kind) = match parts.as_slice() {
        [_, "train", vehicle, kind] if !vehicle.is_empty() => (*vehicle, *kind),
        _ => {
            return Err(IngestError::MalformedTopic {
                topic: topic.to_string(),
            })
        }
    };

    if kind != POSITION_KIND {
        return Ok(None);
    }

    let fix: RawFix = serde_json::from_str(payload).map_err(|source| IngestError::Payload {
        topic: topic.to_string(),
        source,
    })?;

    Ok(Some(FixMessage {
        vehicle_id: vehicle_id.to_string(),
        fix,
    }))
}

/// Decode one feed line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str, namespace: &str) -> Result<Option<FixMessage>, IngestError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (topic, payload) = line.split_once(char::is_whitespace).ok_or_else(|| IngestError::MalformedLine {
        line: line.to_string(),
    })?;
    parse_message(topic, payload.trim_start(), namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_message() {
        let msg = parse_message("c3toc/train/demo/pos", r#"{"lat": 53.03, "lon": 13.3, "speed": 3.6, "sat": 99}"#, "c3toc")
            .unwrap()
            .unwrap();
        assert_eq!(msg.vehicle_id, "demo");
        assert_eq!(msg.fix.speed, 3.6);
        assert_eq!(msg.fix.sat, Some(99));
    }

    #[test]
    fn test_status_and_foreign_namespace_ignored() {
        assert!(parse_message("c3toc/train/demo/status", "alive", "c3toc").unwrap().is_none());
        assert!(parse_message("other/train/demo/pos", "{}", "c3toc").unwrap().is_none());
    }

    #[test]
    fn test_malformed_topics() {
        for topic in ["c3toc/train/demo", "c3toc/bus/demo/pos", "c3toc/train//pos", "c3toc/train/a/b/pos"] {
            assert!(
                matches!(parse_message(topic, "{}", "c3toc"), Err(IngestError::MalformedTopic { .. })),
                "{topic} should be malformed"
            );
        }
    }

    #[test]
    fn test_payload_missing_required_field() {
        let err = parse_message("c3toc/train/demo/pos", r#"{"lat": 1, "lon": 2}"#, "c3toc").unwrap_err();
        assert!(matches!(err, IngestError::Payload { .. }));
    }

    #[test]
    fn test_parse_line() {
        let msg = parse_line(
            "c3toc/train/zug1/pos {\"lat\": 0.0015, \"lon\": 0, \"speed\": 36, \"ts\": \"2024-12-27T12:00:00Z\"}\n",
            "c3toc",
        )
        .unwrap()
        .unwrap();
        assert_eq!(msg.vehicle_id, "zug1");
        assert_eq!(msg.fix.ts.as_deref(), Some("2024-12-27T12:00:00Z"));

        assert!(parse_line("   ", "c3toc").unwrap().is_none());
        assert!(matches!(parse_line("c3toc/train/zug1/pos", "c3toc"), Err(IngestError::MalformedLine { .. })));
    }
}

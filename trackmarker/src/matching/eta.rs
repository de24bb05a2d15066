//! Arrival time at the next stop.

use chrono::{DateTime, Duration, Utc};

/// Estimated arrival at `stop_trackmarker` for a vehicle at `trackmarker`
/// moving at `speed_kmh`.
///
/// Stationary or reversing vehicles (speed <= 0) have no estimate. The
/// result has millisecond precision.
pub fn estimate_arrival(
    now: DateTime<Utc>,
    trackmarker: i64,
    stop_trackmarker: i64,
    speed_kmh: f64,
) -> Option<DateTime<Utc>> {
    if speed_kmh.is_nan() || speed_kmh <= 0.0 {
        return None;
    }

    let meters = (trackmarker - stop_trackmarker).unsigned_abs() as f64;
    let meters_per_second = speed_kmh / 3.6;
    let millis = (meters / meters_per_second * 1000.0).round();
    if !millis.is_finite() {
        return None;
    }

    now.checked_add_signed(Duration::milliseconds(millis as i64))
}

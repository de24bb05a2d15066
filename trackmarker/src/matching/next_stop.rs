//! Next-stop lookup with wraparound.

use crate::network::{TrackNetwork, Waypoint};

/// The first stop strictly ahead of `trackmarker`.
///
/// Past the last stop this wraps to the first one. Returns `None` only when
/// the network has no stops.
pub fn next_stop(network: &TrackNetwork, trackmarker: i64) -> Option<&Waypoint> {
    let stops = network.stops();
    // Stops are ascending by trackmarker
    let ahead = stops.partition_point(|stop| stop.trackmarker <= trackmarker);
    stops.get(ahead).or_else(|| stops.first())
}

//! Nearest-point-on-polyline projection.
//!
//! Finds the globally nearest sampled network point to a fix, picks the closer
//! of its two neighbours, and places the fix along that segment using the
//! triangle (closest, second, fix) and Heron's formula.
//!
//! # Algorithm
//!
//! ```text
//!            C (fix)
//!           /|\
//!       ca / |h\ bc
//!         /  |  \
//!        A───F───B        A = closest, B = second
//!          proj           trackmarker = A ± proj (toward B)
//! ```
//!
//! `proj` is `sqrt(h² + ca²)` clamped to `[0, ab]`. It equals `|AF|` only for
//! fixes on the line; a fix off to the side lands farther from A than its foot.
//!
//! The scan is exhaustive. A spatial index could replace it as long as it
//! still returns the globally nearest point.

use serde::Serialize;

use crate::coord::{distance, GeoPoint, LocalScale};
use crate::network::{TrackNetwork, TrackPoint};

/// Result of projecting a fix onto the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection<'a> {
    /// Track the nearest point belongs to.
    pub track_name: &'a str,
    /// Projected position along the network in whole meters.
    pub trackmarker: i64,
    /// Nearest sampled network point.
    pub closest: &'a TrackPoint,
    /// The closer neighbour of `closest`, if the track has more than one point.
    pub second: Option<&'a TrackPoint>,
    /// Distance from the fix to `closest` in meters.
    pub distance: f64,
}

/// Project a position onto the network.
///
/// Returns `None` only when the network has no points at all.
pub fn project<'a>(network: &'a TrackNetwork, fix: &GeoPoint) -> Option<Projection<'a>> {
    let scale = network.scale();
    let mut best: Option<(&'a str, &'a [TrackPoint], usize, f64)> = None;

    for track in network.tracks() {
        for (i, point) in track.points.iter().enumerate() {
            let d = distance(fix, &point.position(), scale);
            // Strict comparison keeps the first minimum in scan order
            if best.map_or(true, |(_, _, _, best_d)| d < best_d) {
                best = Some((track.name.as_str(), &track.points, i, d));
            }
        }
    }

    let (track_name, points, index, closest_distance) = best?;
    let closest = &points[index];
    let second = pick_second(points, index, fix, scale);

    let marker = match second {
        Some(second) => trackmarker_on_segment(closest, second, fix, scale),
        None => closest.trackmarker,
    };

    Some(Projection {
        track_name,
        trackmarker: marker as i64,
        closest,
        second,
        distance: closest_distance,
    })
}

/// The neighbour of `points[index]` closer to the fix.
///
/// The previous point wins only when strictly closer than the next one.
fn pick_second<'a>(
    points: &'a [TrackPoint],
    index: usize,
    fix: &GeoPoint,
    scale: &LocalScale,
) -> Option<&'a TrackPoint> {
    let previous = index.checked_sub(1).map(|i| &points[i]);
    let next = points.get(index + 1);

    match (previous, next) {
        (Some(p), Some(n)) => {
            let dp = distance(fix, &p.position(), scale);
            let dn = distance(fix, &n.position(), scale);
            Some(if dp < dn { p } else { n })
        }
        (Some(p), None) => Some(p),
        (None, Some(n)) => Some(n),
        (None, None) => None,
    }
}

/// Fractional trackmarker of the fix on segment A (closest) → B (second).
fn trackmarker_on_segment(a: &TrackPoint, b: &TrackPoint, c: &GeoPoint, scale: &LocalScale) -> f64 {
    let ab = distance(&a.position(), &b.position(), scale);
    if ab == 0.0 {
        // Zero-length segment: Heron would divide by zero
        return a.trackmarker;
    }

    let bc = distance(&b.position(), c, scale);
    if bc == 0.0 {
        return b.trackmarker;
    }

    let ca = distance(c, &a.position(), scale);
    if ca == 0.0 {
        return a.trackmarker;
    }

    let proj = along_segment(ab, bc, ca);
    if b.trackmarker > a.trackmarker {
        a.trackmarker + proj
    } else {
        a.trackmarker - proj
    }
}

/// Offset of C from A along AB: `sqrt(h² + ca²)` clamped to `[0, ab]`.
///
/// Zero when the foot of C's perpendicular falls on or behind A.
/// Requires `ab > 0`.
pub(crate) fn along_segment(ab: f64, bc: f64, ca: f64) -> f64 {
    // Right or obtuse angle at A
    if bc * bc >= ab * ab + ca * ca {
        return 0.0;
    }

    let s = (ab + bc + ca) / 2.0;
    // Collinear inputs can drift slightly negative
    let area = (s * (s - ab) * (s - bc) * (s - ca)).max(0.0).sqrt();
    let h = 2.0 * area / ab;

    (h * h + ca * ca).sqrt().min(ab)
}

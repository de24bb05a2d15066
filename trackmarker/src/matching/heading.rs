//! Travel direction with jitter damping.

use crate::coord::{self, GeoPoint, LocalScale};

/// Movements shorter than this keep the previous heading.
pub const JITTER_THRESHOLD_M: f64 = 2.0;

/// A previously reported position and the heading derived for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorFix {
    pub position: GeoPoint,
    pub heading: i32,
}

/// Heading in whole degrees for a vehicle moving to `current`.
///
/// The first fix of a vehicle has heading 0. GPS noise while standing still
/// would otherwise spin the heading, so moves under [`JITTER_THRESHOLD_M`]
/// keep the prior value.
pub fn estimate_heading(prior: Option<&PriorFix>, current: &GeoPoint, scale: &LocalScale) -> i32 {
    let Some(prior) = prior else {
        return 0;
    };

    if coord::distance(&prior.position, current, scale) < JITTER_THRESHOLD_M {
        return prior.heading;
    }

    coord::heading(&prior.position, current) as i32
}

//! Map matching: relate a raw position fix to the track network.
//!
//! All functions here are pure. [`project`] places a fix on the network;
//! [`next_stop`], [`estimate_heading`] and [`estimate_arrival`] derive the
//! remaining record fields from that projection.

mod eta;
mod heading;
mod next_stop;
mod projector;

pub use eta::estimate_arrival;
pub use heading::{estimate_heading, PriorFix, JITTER_THRESHOLD_M};
pub use next_stop::next_stop;
pub use projector::{project, Projection};

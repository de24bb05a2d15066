//! Locate command - project a single coordinate onto the network.

use std::path::Path;

use chrono::Utc;
use trackmarker::app::load_network;
use trackmarker::coord::GeoPoint;
use trackmarker::matching::{estimate_arrival, next_stop, project};

use crate::error::CliError;
use crate::runner::load_config;

/// Run the locate command.
///
/// Prints to stdout only; no log file is written.
pub fn run(config: Option<&Path>, lat: f64, lon: f64, speed: Option<f64>) -> Result<(), CliError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(CliError::Config(format!(
            "Coordinates must be finite, got {}, {}",
            lat, lon
        )));
    }

    let config = load_config(config)?;
    let network = load_network(&config)?;

    let fix = GeoPoint::new(lat, lon);
    let Some(projection) = project(&network, &fix) else {
        println!("Track network is empty.");
        return Ok(());
    };

    println!("Position:    {:.6}, {:.6}", lat, lon);
    println!("Track:       {}", projection.track_name);
    println!("Trackmarker: {} m", projection.trackmarker);
    println!("Off track:   {:.1} m", projection.distance);

    match next_stop(&network, projection.trackmarker) {
        Some(stop) => {
            println!("Next stop:   {} (km {:.3})", stop.name, stop.trackmarker as f64 / 1000.0);
            if let Some(speed) = speed {
                let now = Utc::now();
                match estimate_arrival(now, projection.trackmarker, stop.trackmarker, speed) {
                    Some(eta) => println!(
                        "Arrival:     {} ({} s)",
                        eta.to_rfc3339(),
                        (eta - now).num_seconds()
                    ),
                    None => println!("Arrival:     unknown (not moving)"),
                }
            }
        }
        None => println!("Next stop:   none"),
    }
    Ok(())
}

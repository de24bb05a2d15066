//! Export command - write the static network files.

use std::path::{Path, PathBuf};

use tracing::info;
use trackmarker::config::OutputSettings;
use trackmarker::output::{write_station_table, write_tracks_geojson, write_tracks_json};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the export command.
pub fn run(config: Option<&Path>, out_dir: Option<&Path>) -> Result<(), CliError> {
    let runner = CliRunner::new(config)?;
    runner.log_startup("export");

    let network = runner.load_network()?;
    let (tracks_json, tracks_geojson, station_table) = targets(&runner.config().output, out_dir);

    write_tracks_json(&tracks_json, &network)?;
    write_tracks_geojson(&tracks_geojson, &network)?;
    write_station_table(&station_table, &network)?;

    info!(
        tracks = network.tracks().len(),
        waypoints = network.waypoints().len(),
        "Network exported"
    );
    for path in [&tracks_json, &tracks_geojson, &station_table] {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Output paths, keeping configured file names when redirected to `out_dir`.
fn targets(output: &OutputSettings, out_dir: Option<&Path>) -> (PathBuf, PathBuf, PathBuf) {
    let place = |path: &Path| match (out_dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    };
    (
        place(&output.tracks_json),
        place(&output.tracks_geojson),
        place(&output.station_table),
    )
}

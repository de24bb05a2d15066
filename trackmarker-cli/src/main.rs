//! Trackmarker CLI - command-line interface
//!
//! `run` tracks live vehicles, `export` writes the static network files,
//! `locate` projects a single coordinate and `init` writes a config file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{export, init, locate, run};

#[derive(Parser)]
#[command(name = "trackmarker")]
#[command(version = trackmarker::VERSION)]
#[command(about = "Map-match live train GPS fixes onto a rail network", long_about = None)]
struct Cli {
    /// Config file (default: ~/.trackmarker/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track vehicles from the fix feed and publish their state
    Run {
        /// Read fixes from stdin instead of the configured TCP feed
        #[arg(long)]
        stdin: bool,

        /// Override [ingest] address
        #[arg(long)]
        address: Option<String>,
    },

    /// Write the track network as JSON, GeoJSON and a station table
    Export {
        /// Directory to write into instead of the configured paths
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Project one coordinate onto the network and print the result
    Locate {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Speed in km/h, for an arrival estimate at the next stop
        #[arg(long)]
        speed: Option<f64>,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run { stdin, address } => run::run(run::RunArgs {
            config,
            stdin,
            address,
        }),
        Commands::Export { out_dir } => export::run(config, out_dir.as_deref()),
        Commands::Locate { lat, lon, speed } => locate::run(config, lat, lon, speed),
        Commands::Init { force } => init::run(config, force),
    };

    if let Err(e) = result {
        e.exit();
    }
}

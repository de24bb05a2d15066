//! Run command - track live vehicles until the feed ends or Ctrl+C.

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use trackmarker::app::{AppConfig, TrackerApp};
use trackmarker::config::IngestSource;
use trackmarker::ingest::FixFeed;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
pub struct RunArgs<'a> {
    pub config: Option<&'a Path>,
    pub stdin: bool,
    pub address: Option<String>,
}

/// Run the run command.
pub fn run(args: RunArgs<'_>) -> Result<(), CliError> {
    let mut runner = CliRunner::new(args.config)?;
    runner.log_startup("run");

    // CLI overrides config
    if args.stdin {
        runner.config_mut().ingest.source = IngestSource::Stdin;
    }
    if let Some(address) = args.address {
        runner.config_mut().ingest.address = address;
    }

    let network = Arc::new(runner.load_network()?);
    let app_config = AppConfig::from_config_file(runner.config());

    println!("Trackmarker v{}", trackmarker::VERSION);
    println!("==================");
    println!();
    println!("Tracks:   {}", network.tracks().len());
    println!("Stops:    {}", network.stops().len());
    match &app_config.feed {
        FixFeed::Stdin => println!("Feed:     stdin"),
        FixFeed::Tcp(feed) => println!("Feed:     tcp://{}", feed.address()),
    }
    println!("Trains:   {}", app_config.outputs.json.display());
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let result = runtime.block_on(async move {
        let app = TrackerApp::start(app_config, network).await?;

        let cancel = app.cancellation_token();
        ctrlc::set_handler(move || {
            println!();
            println!("Received shutdown signal, stopping...");
            cancel.cancel();
        })
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

        Ok::<_, CliError>(app.wait().await?)
    });
    // A pending stdin read holds a blocking thread that never finishes on its own
    runtime.shutdown_background();
    let stats = result?;

    info!(
        applied = stats.applied,
        ignored = stats.ignored,
        rejected = stats.rejected,
        "Run finished"
    );
    println!();
    println!("Session Summary");
    println!("───────────────");
    println!("  Fixes applied:  {}", stats.applied);
    println!("  Ignored:        {}", stats.ignored);
    println!("  Rejected:       {}", stats.rejected);
    Ok(())
}

//! CLI runner for common setup.
//!
//! Loads the config file and initializes logging for commands that need them.

use std::path::Path;

use tracing::info;
use trackmarker::app::load_network;
use trackmarker::config::ConfigFile;
use trackmarker::logging::{init_logging, LoggingGuard};
use trackmarker::network::TrackNetwork;

use crate::error::CliError;

/// Owns the config and keeps logging alive for a command's lifetime.
pub struct CliRunner {
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config (explicit path or the default location) and start logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Mutable access, for command-line overrides.
    pub fn config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Trackmarker v{}", trackmarker::VERSION);
        info!("Trackmarker CLI: {} command", command);
    }

    /// Load the track network named by the config.
    pub fn load_network(&self) -> Result<TrackNetwork, CliError> {
        info!(path = %self.config.network.track_file.display(), "Loading track network");
        Ok(load_network(&self.config)?)
    }
}

/// Load the config without touching logging.
pub fn load_config(config_path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

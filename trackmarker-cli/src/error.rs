//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use trackmarker::app::AppError;
use trackmarker::config::ConfigFileError;
use trackmarker::network::LoadError;
use trackmarker::output::OutputError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Track file could not be loaded
    Network(LoadError),
    /// Failed to write an output file
    Output(OutputError),
    /// The tracker stopped with an error
    Tracker(AppError),
    /// Tokio runtime could not be built
    Runtime(std::io::Error),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Network(_) => {
                eprintln!();
                eprintln!("Check [network] track_file in the config file, or run");
                eprintln!("'trackmarker init' to create one.");
            }
            CliError::Tracker(AppError::Feed(_)) => {
                eprintln!();
                eprintln!("Is the fix feed running at [ingest] address?");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Network(e) => write!(f, "Failed to load track network: {}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
            CliError::Tracker(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Network(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Tracker(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        CliError::Network(e)
    }
}

impl From<OutputError> for CliError {
    fn from(e: OutputError) -> Self {
        CliError::Output(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Network(e) => CliError::Network(e),
            other => CliError::Tracker(other),
        }
    }
}

//! Application error types.

use std::fmt;

use crate::ingest::IngestError;
use crate::network::LoadError;

/// Errors that can occur during the application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// The track network could not be loaded.
    Network(LoadError),

    /// The fix feed ended with an error.
    Feed(IngestError),

    /// A background task panicked or was aborted.
    Task(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(e) => write!(f, "Failed to load track network: {}", e),
            AppError::Feed(e) => write!(f, "Fix feed failed: {}", e),
            AppError::Task(msg) => write!(f, "Background task failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Network(e) => Some(e),
            AppError::Feed(e) => Some(e),
            AppError::Task(_) => None,
        }
    }
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        AppError::Network(e)
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        AppError::Feed(e)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Task(e.to_string())
    }
}

//! Configuration from `~/.trackmarker/config.ini`.
//!
//! [`ConfigFile`] holds one typed struct per INI section. A missing file or
//! key falls back to the constants re-exported from here.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, IngestSettings, IngestSource, LoggingSettings, NetworkSettings, OutputSettings,
    StateSettings,
};

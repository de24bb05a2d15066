//! Init command - write a default configuration file.

use std::path::Path;

use trackmarker::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
///
/// An existing file is kept (and re-saved with any missing keys filled in)
/// unless `force` is set.
pub fn run(config: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = config.map(Path::to_path_buf).unwrap_or_else(config_file_path);

    let existing = path.exists();
    let file = if existing && !force {
        ConfigFile::load_from(&path)?
    } else {
        ConfigFile::default()
    };
    file.save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    if existing && !force {
        println!("Existing settings were kept. Use --force to reset to defaults.");
    }
    println!("Edit this file to point [network] track_file at your GPX file");
    println!("and [ingest] address at your fix feed.");
    Ok(())
}

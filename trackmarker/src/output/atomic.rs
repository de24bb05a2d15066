//! Replace-by-rename file writes.
//!
//! Readers (the web server) see either the previous file or the complete new
//! one, never a partial write.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::error::OutputError;

/// Permissions of published files: group-writable, world-readable.
#[cfg(unix)]
pub const PUBLISHED_FILE_MODE: u32 = 0o664;

/// Write `path` through a temporary file in the same directory.
///
/// The parent directory is created if missing. On any error the target is
/// left untouched and the temporary file is removed.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), OutputError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(OutputError::io(path))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(OutputError::io(path))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer).map_err(OutputError::io(path))?;
        writer.flush().map_err(OutputError::io(path))?;
    }
    set_published_mode(temp.as_file()).map_err(OutputError::io(path))?;

    temp.persist(path)
        .map_err(|e| OutputError::io(path)(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_published_mode(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(PUBLISHED_FILE_MODE))
}

#[cfg(not(unix))]
fn set_published_mode(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("trains.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, |w| w.write_all(b"new")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("webroot/trains.json");

        write_atomic(&path, |w| w.write_all(b"{}")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_failed_write_keeps_old_content_and_no_temp_files() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("trains.json");
        fs::write(&path, "old").unwrap();

        let result = write_atomic(&path, |w| {
            w.write_all(b"partial")?;
            Err(io::Error::new(io::ErrorKind::Other, "serializer failed"))
        });

        assert!(matches!(result, Err(OutputError::Io { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_published_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("tracks.geojson");
        write_atomic(&path, |w| w.write_all(b"{}")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, PUBLISHED_FILE_MODE);
    }
}

use crate::fixer::FixError;
use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Appended to the original path to name its backup.
pub const BACKUP_SUFFIX: &str = ".backup";

/// `movie.avi` -> `movie.avi.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copy the still-unmodified contents of `source` next to `path`.
///
/// The copy is staged in a temp file in the same directory, fsynced, and
/// moved into place without replacing anything. An existing backup is never
/// overwritten: that is reported as [`FixError::BackupExists`] and the caller
/// must leave the original alone. On success the backup carries the
/// original's permissions and modification time.
pub fn create_backup(path: &Path, source: &mut File) -> Result<PathBuf, FixError> {
    let target = backup_path(path);
    if target.symlink_metadata().is_ok() {
        return Err(FixError::BackupExists { path: target });
    }

    let io_err = |source: io::Error| FixError::Io {
        path: target.clone(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let metadata = source.metadata().map_err(|source| FixError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;

    source.seek(SeekFrom::Start(0)).map_err(|source| FixError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    io::copy(source, temp.as_file_mut()).map_err(io_err)?;
    temp.as_file_mut().flush().map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;

    temp.persist_noclobber(&target).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            FixError::BackupExists {
                path: target.clone(),
            }
        } else {
            io_err(e.error)
        }
    })?;

    fs::set_permissions(&target, metadata.permissions()).map_err(io_err)?;
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(&target, mtime).map_err(io_err)?;

    tracing::debug!(backup = %target.display(), bytes = metadata.len(), "backup written");
    Ok(target)
}

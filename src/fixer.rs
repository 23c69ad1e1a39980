//! Per-file FourCC patching.
//!
//! Each file goes through a fixed sequence of gates, stopping at the first
//! one that applies:
//!
//! 1. log the path
//! 2. read-only gate (skip, or clear the flag and carry on)
//! 3. read the identifier at [`HANDLER_OFFSET`]; files too short are left alone
//! 4. validate it against [`MAPPINGS`](crate::fourcc::MAPPINGS) unless the
//!    check is disabled
//! 5. optional backup, which must not already exist
//! 6. write the replacement at both header offsets
//!
//! The file handle opened in step 3 is used for the backup copy and both
//! writes, and is closed when [`process_file`] returns.

use crate::backup::create_backup;
use crate::fourcc::{
    lookup, replacement_for, FourCc, COMPRESSION_OFFSET, FOURCC_LEN, HANDLER_OFFSET,
};
use crate::log::LogSink;
use crate::walk::SearchMode;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Options fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policy {
    /// Leave read-only files untouched instead of clearing the flag.
    pub skip_read_only: bool,
    /// Patch whatever identifier is present, recognized or not.
    pub skip_check: bool,
    /// Copy each file to `<path>.backup` before writing to it.
    pub backup: bool,
    pub search: SearchMode,
}

/// What happened to a file that was processed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "FileOutcome should be recorded in the run summary"]
pub enum FileOutcome {
    Patched {
        observed: FourCc,
        written: FourCc,
        backup: Option<PathBuf>,
    },
    SkippedReadOnly,
    Unrecognized {
        observed: FourCc,
    },
    /// Fewer than four bytes at the handler offset.
    TooShort,
}

#[derive(Error, Debug)]
pub enum FixError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Backup already exists: {path}")]
    BackupExists { path: PathBuf },
}

impl FixError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> FixError + '_ {
        move |source| FixError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Inspect one file and patch its FourCC if the policy allows.
///
/// Every decision is appended to `log`. Errors are returned rather than
/// logged so the caller decides how a failed file is reported.
pub fn process_file(
    path: &Path,
    policy: &Policy,
    log: &mut dyn LogSink,
) -> Result<FileOutcome, FixError> {
    log.append(&path.display().to_string());

    let metadata = fs::metadata(path).map_err(FixError::io(path))?;
    if metadata.permissions().readonly() {
        if policy.skip_read_only {
            log.append("Read-only, skipping");
            log.blank();
            return Ok(FileOutcome::SkippedReadOnly);
        }

        log.append("Turning off read-only flag");
        clear_readonly(path, metadata.permissions())?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(FixError::io(path))?;

    let raw = read_fourcc(&mut file, HANDLER_OFFSET).map_err(FixError::io(path))?;
    let Some(raw) = raw else {
        tracing::debug!(path = %path.display(), "file too short for an AVI header");
        return Ok(FileOutcome::TooShort);
    };

    let observed = raw.to_lowercase();
    log.append(&format!("Used FourCC: {observed}"));

    if !policy.skip_check && lookup(observed).is_none() {
        log.append("Not divx/xvid/div3 FourCC, skipping");
        log.blank();
        return Ok(FileOutcome::Unrecognized { observed });
    }

    let replacement = replacement_for(observed);

    let backup = if policy.backup {
        let target = create_backup(path, &mut file)?;
        log.append(&format!("Backup created: {}", target.display()));
        Some(target)
    } else {
        None
    };

    write_fourcc(&mut file, HANDLER_OFFSET, replacement.to_lowercase())
        .map_err(FixError::io(path))?;
    write_fourcc(&mut file, COMPRESSION_OFFSET, replacement.to_uppercase())
        .map_err(FixError::io(path))?;

    log.append(&format!("Changed FourCC: {}", replacement.to_uppercase()));
    log.blank();

    tracing::debug!(
        path = %path.display(),
        from = %observed,
        to = %replacement,
        "fourcc rewritten"
    );

    Ok(FileOutcome::Patched {
        observed,
        written: replacement,
        backup,
    })
}

/// Read four bytes at `offset`, or `None` if the file ends first.
fn read_fourcc(file: &mut File, offset: u64) -> io::Result<Option<FourCc>> {
    let mut buf = [0u8; FOURCC_LEN];
    file.seek(SeekFrom::Start(offset))?;
    match file.read_exact(&mut buf) {
        Ok(()) => Ok(Some(FourCc::from_bytes(buf))),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

fn write_fourcc(file: &mut File, offset: u64, value: FourCc) -> io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(value.as_bytes())
}

#[cfg(unix)]
fn clear_readonly(path: &Path, permissions: fs::Permissions) -> Result<(), FixError> {
    use std::os::unix::fs::PermissionsExt;

    // Owner write only; group/other bits stay as they were.
    let mode = permissions.mode() | 0o200;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(FixError::io(path))
}

#[cfg(not(unix))]
fn clear_readonly(path: &Path, mut permissions: fs::Permissions) -> Result<(), FixError> {
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions).map_err(FixError::io(path))
}

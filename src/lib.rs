//! FourCC Fixer: rewrites XviD/DivX codec tags in AVI headers
//!
//! Some players refuse AVI files tagged `XVID`, `DIVX` or `DIV3` even though
//! their own MPEG-4 decoder handles the stream fine. Rewriting the tag to
//! `FMP4` (or `MP43` for `DIV3`) in the two places the header stores it is
//! enough to make them play.
//!
//! # Architecture
//!
//! - [`walk`] finds candidate files, absorbing directory errors per subtree.
//! - [`fixer`] validates and patches one file at a time under a [`Policy`].
//! - [`run`] drives the fixer over a file list and counts outcomes.
//! - [`log`] holds the run log sinks (console, or buffered for a log file).
//! - [`config`] loads persistent defaults from a TOML settings file.
//!
//! # Safety
//!
//! - Only the 4 bytes at each of two fixed offsets are ever written
//! - Nothing is written unless the current tag is recognized (unless told otherwise)
//! - Backups are taken before the first write and never overwrite an existing backup
//! - A failure on one file never stops the rest of the run
//!
//! # Example
//!
//! ```no_run
//! use fourcc_fixer::{fix_files, BufferedLog, Policy};
//!
//! let policy = Policy {
//!     backup: true,
//!     ..Policy::default()
//! };
//! let mut log = BufferedLog::new();
//! let summary = fix_files(["movie.avi"], &policy, &mut log);
//!
//! println!("{} patched, {} failed", summary.patched, summary.failed);
//! ```

pub mod backup;
pub mod config;
pub mod fixer;
pub mod fourcc;
pub mod input;
pub mod log;
pub mod run;
pub mod walk;

// Re-exports
pub use backup::{backup_path, create_backup, BACKUP_SUFFIX};
pub use config::{load_from_path, load_from_str, ConfigError, Settings};
pub use fixer::{process_file, FileOutcome, FixError, Policy};
pub use fourcc::{
    FourCc, Mapping, COMPRESSION_OFFSET, FOURCC_LEN, GENERAL_REPLACEMENT, HANDLER_OFFSET,
    LEGACY_REPLACEMENT, LEGACY_SOURCE, MAPPINGS,
};
pub use input::{resolve_inputs, InputError};
pub use log::{BufferedLog, ConsoleLog, LogSink};
pub use run::{error_chain, fix_files, RunSummary};
pub use walk::{enumerate, FilePattern, SearchMode, DEFAULT_PATTERN};

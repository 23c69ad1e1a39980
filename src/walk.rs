//! Candidate discovery over directory trees.
//!
//! Enumeration never fails as a whole. A directory that cannot be listed
//! (permissions, over-long names, removed mid-scan) just contributes no
//! files, and the walk carries on with its siblings.

use glob::{MatchOptions, Pattern, PatternError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Pattern used when the caller does not name explicit files.
pub const DEFAULT_PATTERN: &str = "*.avi";

/// Whether enumeration descends into subdirectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    TopDirectoryOnly,
    #[default]
    AllDirectories,
}

impl SearchMode {
    fn max_depth(self) -> usize {
        match self {
            SearchMode::TopDirectoryOnly => 1,
            SearchMode::AllDirectories => usize::MAX,
        }
    }
}

/// Filename glob such as `*.avi`, matched against the final path component
/// only and ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    pattern: Pattern,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Check a bare file name against the pattern.
    pub fn matches(&self, name: &OsStr) -> bool {
        self.pattern.matches_with(&name.to_string_lossy(), MATCH_OPTIONS)
    }

    /// Check the file name component of `path`.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.matches(name))
    }
}

impl Default for FilePattern {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN).expect("DEFAULT_PATTERN is a valid glob")
    }
}

/// List files under `root` whose names match `pattern`.
///
/// The result is unordered and not deduplicated. An unreadable or missing
/// `root` yields an empty list.
pub fn enumerate(root: &Path, pattern: &FilePattern, mode: SearchMode) -> Vec<PathBuf> {
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(mode.max_depth())
        .follow_links(false);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };

        if is_regular_file(&entry) && pattern.matches(entry.file_name()) {
            found.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), count = found.len(), "enumeration finished");
    found
}

fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    // Symlinks to files are candidates; symlinked directories are never walked.
    entry.path_is_symlink() && entry.path().is_file()
}

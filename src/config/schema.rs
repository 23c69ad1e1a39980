use crate::fixer::Policy;
use crate::walk::SearchMode;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Persistent defaults read from a TOML settings file.
///
/// ```toml
/// backup = true
/// skip_read_only = false
/// skip_check = false
/// top_directory_only = false
/// log_file = "fourcc-fixer.log"
/// ```
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub backup: bool,
    pub skip_read_only: bool,
    pub skip_check: bool,
    pub top_directory_only: bool,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if let Some(log_file) = &self.log_file {
            if log_file.as_os_str().to_string_lossy().trim().is_empty() {
                issues.push(ValidationIssue::EmptyField { field: "log_file" });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Turn on any option set in `flags`. Flags never switch an option off.
    pub fn merge_flags(&mut self, flags: &Settings) {
        self.backup |= flags.backup;
        self.skip_read_only |= flags.skip_read_only;
        self.skip_check |= flags.skip_check;
        self.top_directory_only |= flags.top_directory_only;
        if flags.log_file.is_some() {
            self.log_file = flags.log_file.clone();
        }
    }

    pub fn policy(&self) -> Policy {
        Policy {
            skip_read_only: self.skip_read_only,
            skip_check: self.skip_check,
            backup: self.backup,
            search: if self.top_directory_only {
                SearchMode::TopDirectoryOnly
            } else {
                SearchMode::AllDirectories
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyField { field: &'static str },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyField { field } => {
                write!(f, "setting '{field}' must not be empty")
            }
        }
    }
}

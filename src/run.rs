//! Sequential run over a list of candidate files.

use crate::fixer::{process_file, FileOutcome, Policy};
use crate::log::LogSink;
use std::error::Error;
use std::fmt::Write as _;
use std::path::Path;

/// Per-outcome counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub patched: usize,
    pub skipped_read_only: usize,
    pub unrecognized: usize,
    pub too_short: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Patched { .. } => self.patched += 1,
            FileOutcome::SkippedReadOnly => self.skipped_read_only += 1,
            FileOutcome::Unrecognized { .. } => self.unrecognized += 1,
            FileOutcome::TooShort => self.too_short += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.patched + self.skipped_read_only + self.unrecognized + self.too_short + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Process `files` one after another.
///
/// A file that fails is logged with its full error chain and counted; the
/// remaining files are still processed.
pub fn fix_files<I, P>(files: I, policy: &Policy, log: &mut dyn LogSink) -> RunSummary
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut summary = RunSummary::default();

    for file in files {
        let path = file.as_ref();
        match process_file(path, policy, log) {
            Ok(outcome) => summary.record(&outcome),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "file not processed");
                log.append(&error_chain(&err));
                log.blank();
                summary.failed += 1;
            }
        }
    }

    summary
}

/// `err: cause: cause` on one line.
pub fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // thiserror messages often already embed their source.
        if !out.ends_with(&text) {
            let _ = write!(out, ": {text}");
        }
        source = cause.source();
    }
    out
}

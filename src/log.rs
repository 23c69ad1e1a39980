//! Run log sinks.
//!
//! The run log is the user-facing transcript of a run: one line per decision
//! taken for each file. It is separate from `tracing` diagnostics.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Destination for run log lines.
pub trait LogSink {
    fn append(&mut self, line: &str);

    /// Separator written after each file's final line.
    fn blank(&mut self) {
        self.append("");
    }
}

/// Prints each line to stdout as soon as it is appended.
///
/// A closed stdout (say, piped into `head`) drops the line; the run goes on.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLog;

impl LogSink for ConsoleLog {
    fn append(&mut self, line: &str) {
        write_line(&mut io::stdout().lock(), line);
    }
}

fn write_line(out: &mut impl Write, line: &str) {
    if let Err(err) = writeln!(out, "{line}") {
        tracing::debug!(error = %err, "console log line dropped");
    }
}

/// Collects lines in memory so the caller can write them out once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferedLog {
    lines: Vec<String>,
}

impl BufferedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The full log, each line newline-terminated.
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Write the buffered log to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.contents())
    }
}

impl LogSink for BufferedLog {
    fn append(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

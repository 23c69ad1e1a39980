use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use fourcc_fixer::config::{load_from_path, locate, Settings};
use fourcc_fixer::{
    fix_files, resolve_inputs, BufferedLog, ConsoleLog, FilePattern, InputError, LogSink, Policy,
    RunSummary,
};
use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fourcc-fixer")]
#[command(about = "Rewrite XviD/DivX FourCC codes in AVI files to FMP4/MP43", long_about = None)]
#[command(version)]
#[command(
    after_help = "With no PATHS, every .avi file under the current directory is processed:\n\
                  xvid/divx become FMP4, div3 becomes MP43, read-only files are made writable,\n\
                  and no backups are taken."
)]
struct Cli {
    /// Copy each file to <file>.backup before patching it
    #[arg(short, long)]
    backup: bool,

    /// Leave read-only files alone instead of clearing the read-only flag
    #[arg(short = 'r', long)]
    skip_read_only: bool,

    /// Patch every file, not only those tagged xvid, divx or div3
    #[arg(short = 'c', long)]
    skip_check: bool,

    /// Only search the top level of each directory
    #[arg(short, long)]
    top_directory_only: bool,

    /// Write the run log to FILE when finished instead of the console
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Settings file (default: $FOURCC_FIXER_CONFIG, then ~/.fourcc-fixer.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Diagnostics level on stderr (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// .avi files or directories to search
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,
}

impl Cli {
    fn flags(&self) -> Settings {
        Settings {
            backup: self.backup,
            skip_read_only: self.skip_read_only,
            skip_check: self.skip_check,
            top_directory_only: self.top_directory_only,
            log_file: self.log.clone(),
        }
    }
}

/// How the processing phase ended.
enum RunEnd {
    NothingFound,
    Finished(RunSummary),
    Aborted,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize diagnostics
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // 1. Settings file, then command-line flags on top
    let mut settings = match locate(cli.config.as_deref()) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading settings");
            load_from_path(&path)?
        }
        None => Settings::default(),
    };
    settings.merge_flags(&cli.flags());
    let policy = settings.policy();

    // 2. Resolve inputs; any bad path stops here, before a single write
    let pattern = FilePattern::default();
    let files = match resolve_inputs(&cli.paths, &pattern, policy.search) {
        Ok(files) => files,
        Err(err @ InputError::InvalidPath { .. }) => {
            eprintln!("{}", err.to_string().red());
            eprintln!("Run with --help for usage.");
            process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    // 3. Process, logging to the console or to a buffer flushed once at the end
    let end = match &settings.log_file {
        Some(log_file) => {
            let mut log = BufferedLog::new();
            let end = run(&files, &policy, &mut log);
            log.write_to(log_file)
                .with_context(|| format!("failed to write log file {}", log_file.display()))?;
            end
        }
        None => run(&files, &policy, &mut ConsoleLog),
    };

    // 4. Summary
    match end {
        RunEnd::NothingFound => Ok(()),
        RunEnd::Finished(summary) => {
            print_summary(&summary, settings.log_file.as_deref());
            if summary.has_failures() {
                process::exit(1);
            }
            Ok(())
        }
        RunEnd::Aborted => {
            eprintln!("{}", "Run aborted by an unexpected error".red());
            process::exit(1);
        }
    }
}

fn run(files: &[PathBuf], policy: &Policy, log: &mut dyn LogSink) -> RunEnd {
    if files.is_empty() {
        log.append("0 .avi files found to process");
        return RunEnd::NothingFound;
    }

    // Per-file failures never escape fix_files; this only catches bugs, so the
    // log still gets flushed.
    match panic::catch_unwind(AssertUnwindSafe(|| fix_files(files, policy, &mut *log))) {
        Ok(summary) => RunEnd::Finished(summary),
        Err(payload) => {
            log.append(&format!("Unexpected error: {}", panic_message(payload.as_ref())));
            RunEnd::Aborted
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

fn print_summary(summary: &RunSummary, log_file: Option<&Path>) {
    // stdout may already be closed by the reader; the exit code still reports
    if let Err(err) = write_summary(&mut io::stdout().lock(), summary, log_file) {
        tracing::debug!(error = %err, "summary not printed");
    }
}

fn write_summary(
    out: &mut impl Write,
    summary: &RunSummary,
    log_file: Option<&Path>,
) -> io::Result<()> {
    if let Some(path) = log_file {
        writeln!(out, "{}", format!("Log written to {}", path.display()).dimmed())?;
    }

    writeln!(out, "{}", "Summary:".bold())?;
    writeln!(out, "  {} patched", format!("{}", summary.patched).green())?;
    writeln!(
        out,
        "  {} not xvid/divx/div3",
        format!("{}", summary.unrecognized).yellow()
    )?;
    writeln!(
        out,
        "  {} read-only skipped",
        format!("{}", summary.skipped_read_only).cyan()
    )?;
    writeln!(out, "  {} too short", format!("{}", summary.too_short).cyan())?;
    writeln!(out, "  {} failed", format!("{}", summary.failed).red())
}

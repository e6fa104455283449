//! Per-file status lines and the run summary.

use anyhow::Result;
use hashside_core::{Algorithm, Mode, Outcome, Report};
use std::io::{self, Write};
use tracing::debug;

/// Writer for command output, stdout unless a test supplies another sink.
pub struct OutputWriter<W = io::Stdout> {
    out: W,
    closed: bool,
}

impl OutputWriter {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out, closed: false }
    }

    /// Print one line for a processed file.
    ///
    /// The first failed write is logged and silences every later line; the
    /// run keeps going either way.
    pub fn outcome(&mut self, outcome: &Outcome) {
        if self.closed {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", format_outcome(outcome)) {
            debug!("Stopped printing outcomes: {}", e);
            self.closed = true;
        }
    }

    /// Print the closing summary.
    pub fn summary(&mut self, report: &Report) -> Result<()> {
        write!(self.out, "{}", format_summary(report))?;
        self.out.flush()?;
        Ok(())
    }

    /// Print the supported algorithm identifiers, one per line.
    pub fn algorithms(&mut self) -> Result<()> {
        for algo in Algorithm::ALL {
            if algo == Algorithm::default() {
                writeln!(self.out, "{} (default)", algo)?;
            } else {
                writeln!(self.out, "{}", algo)?;
            }
        }
        Ok(())
    }
}

fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Generated { sidecar, .. } => format!("✓ Generated: {}", sidecar.display()),
        Outcome::Deleted { sidecar } => format!("✓ Deleted: {}", sidecar.display()),
        Outcome::Skipped { path, reason } => format!("- Skipped: {} ({})", path.display(), reason),
        Outcome::Failed { path, reason } => format!("✗ Failed: {} - {}", path.display(), reason),
    }
}

fn format_summary(report: &Report) -> String {
    let mut text = match report.mode {
        Mode::Generate => format!("\n✓ Succeeded: {} files\n", report.generated),
        Mode::Delete => format!("\n✓ Deleted: {} sidecar files\n", report.deleted),
    };
    if report.skipped > 0 {
        text.push_str(&format!("- Skipped: {} files\n", report.skipped));
    }
    if report.failed > 0 {
        text.push_str(&format!("✗ Failed: {} files\n", report.failed));
    }
    text
}

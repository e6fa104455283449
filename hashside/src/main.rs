mod output;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use hashside_core::{Algorithm, Mode, RunOptions, Target};
use output::OutputWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Hashside - write or remove digest sidecars (file.txt -> file.txt.sha256)
#[derive(Parser)]
#[command(name = "hashside")]
#[command(about = "Generate or delete per-file digest sidecars", long_about = None)]
#[command(version)]
#[command(group(ArgGroup::new("target").args(["file", "directory"]).multiple(false)))]
struct Cli {
    /// Process a single file
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present_any = ["directory", "list_algorithms"]
    )]
    file: Option<PathBuf>,

    /// Process every file under a directory
    #[arg(
        short,
        long,
        value_name = "DIR",
        required_unless_present_any = ["file", "list_algorithms"]
    )]
    directory: Option<PathBuf>,

    /// Hash algorithm (md5, sha1, sha224, sha256, sha384, sha512, blake2b, blake2s).
    /// Defaults to sha256; with --delete, restricts deletion to that suffix
    #[arg(short, long, value_name = "ALG")]
    algorithm: Option<String>,

    /// Delete sidecars instead of generating them
    #[arg(long)]
    delete: bool,

    /// Descend into subdirectories (default)
    #[arg(short, long, overrides_with = "no_recursive")]
    recursive: bool,

    /// Only process the top level of the directory
    #[arg(long, overrides_with = "recursive")]
    no_recursive: bool,

    /// Skip matching files and directories (glob, repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// List supported algorithms and exit
    #[arg(long)]
    list_algorithms: bool,
}

impl Cli {
    fn target(&self) -> Result<Target> {
        match (&self.file, &self.directory) {
            (Some(file), None) => Ok(Target::File(file.clone())),
            (None, Some(dir)) => Ok(Target::Directory(dir.clone())),
            _ => anyhow::bail!("Specify exactly one of --file or --directory"),
        }
    }

    fn run_options(&self) -> Result<RunOptions> {
        let algorithm = self
            .algorithm
            .as_deref()
            .map(str::parse::<Algorithm>)
            .transpose()?;
        let mode = if self.delete {
            Mode::Delete
        } else {
            Mode::Generate
        };

        Ok(RunOptions::new(self.target()?)
            .with_mode(mode)
            .with_algorithm(algorithm)
            .recursive(!self.no_recursive)
            .with_ignore(self.ignore.iter().cloned()))
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut out = OutputWriter::new();

    if cli.list_algorithms {
        out.algorithms()?;
        return Ok(ExitCode::SUCCESS);
    }

    let options = cli.run_options()?;
    tracing::debug!("Run options: {:?}", options);
    let report = hashside_core::run_with(&options, |outcome| out.outcome(outcome))
        .with_context(|| format!("Cannot {} {}", options.mode, options.target.path().display()))?;

    out.summary(&report)?;

    Ok(if report.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

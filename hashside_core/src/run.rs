//! Generate and delete runs over a target.

use crate::error::{Error, Result};
use crate::hash::{Algorithm, digest_file};
use crate::pattern::PatternMatcher;
use crate::sidecar::{is_sidecar, sidecar_contents, sidecar_path};
use crate::walk::{Selection, TreeWalker};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a run does to each candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Write a sidecar for every source file.
    #[default]
    Generate,
    /// Remove existing sidecars.
    Delete,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Generate => f.write_str("generate"),
            Mode::Delete => f.write_str("delete"),
        }
    }
}

/// The path a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Directory(PathBuf),
}

impl Target {
    pub fn path(&self) -> &Path {
        match self {
            Target::File(path) | Target::Directory(path) => path,
        }
    }
}

/// Immutable configuration for one invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub target: Target,
    pub mode: Mode,
    /// Generate: `None` means [`Algorithm::default`]. Delete: `None` means
    /// sidecars of every algorithm.
    pub algorithm: Option<Algorithm>,
    pub recursive: bool,
    pub ignore: Vec<String>,
}

impl RunOptions {
    /// Recursive generate run with the default algorithm and no exclusions.
    pub fn new(target: Target) -> Self {
        Self {
            target,
            mode: Mode::Generate,
            algorithm: None,
            recursive: true,
            ignore: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Option<Algorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Check the target before anything is touched.
    pub fn validate(&self) -> Result<()> {
        let path = self.target.path();
        let metadata = fs::metadata(path).map_err(|_| Error::target_not_found(path))?;
        match &self.target {
            Target::File(_) if !metadata.is_file() => Err(Error::NotAFile {
                path: path.to_path_buf(),
            }),
            Target::Directory(_) if !metadata.is_dir() => Err(Error::NotADirectory {
                path: path.to_path_buf(),
            }),
            _ => Ok(()),
        }
    }

    fn walker(&self) -> TreeWalker {
        let selection = match self.mode {
            Mode::Generate => Selection::Sources,
            Mode::Delete => Selection::Sidecars(self.algorithm),
        };
        TreeWalker::new(self.target.path())
            .recursive(self.recursive)
            .with_matcher(PatternMatcher::new(&self.ignore))
            .with_selection(selection)
    }
}

/// Result for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Generated { source: PathBuf, sidecar: PathBuf },
    Deleted { sidecar: PathBuf },
    Skipped { path: PathBuf, reason: String },
    Failed { path: PathBuf, reason: String },
}

impl Outcome {
    /// The file the outcome is about.
    pub fn path(&self) -> &Path {
        match self {
            Outcome::Generated { source, .. } => source,
            Outcome::Deleted { sidecar } => sidecar,
            Outcome::Skipped { path, .. } | Outcome::Failed { path, .. } => path,
        }
    }

    fn failed(path: &Path, err: &Error) -> Self {
        Outcome::Failed {
            path: err.path().unwrap_or(path).to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Outcomes of a finished run, in traversal order, with per-kind counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub mode: Mode,
    pub outcomes: Vec<Outcome>,
    pub generated: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Report {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Files that were written or removed.
    pub fn succeeded(&self) -> usize {
        self.generated + self.deleted
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Generated { .. } => self.generated += 1,
            Outcome::Deleted { .. } => self.deleted += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Run without per-file notification.
pub fn run(options: &RunOptions) -> Result<Report> {
    run_with(options, |_| {})
}

/// Run, handing each outcome to `on_outcome` in traversal order.
///
/// Returns `Err` only for configuration errors, which are raised before any
/// file is read. Per-file problems become [`Outcome::Failed`] and the run
/// continues.
pub fn run_with<F>(options: &RunOptions, mut on_outcome: F) -> Result<Report>
where
    F: FnMut(&Outcome),
{
    options.validate()?;

    let algorithm = match options.mode {
        Mode::Generate => Some(options.algorithm.unwrap_or_default()),
        Mode::Delete => options.algorithm,
    };
    info!(
        "Starting {} run on {} (algorithm: {}, recursive: {})",
        options.mode,
        options.target.path().display(),
        algorithm.map_or("any", |a| a.as_str()),
        options.recursive
    );

    let walker = options.walker();
    let mut report = Report::new(options.mode);

    for candidate in walker.walk() {
        let outcome = match candidate {
            Err(e) => Outcome::failed(walker.root(), &e),
            Ok(path) => match options.mode {
                Mode::Generate => generate_one(&path, algorithm.unwrap_or_default()),
                Mode::Delete => delete_one(&path, algorithm),
            },
        };
        if let Outcome::Failed { path, reason } = &outcome {
            warn!("{}: {}", path.display(), reason);
        }
        on_outcome(&outcome);
        report.record(outcome);
    }

    info!(
        "Finished {} run: {} succeeded, {} skipped, {} failed",
        report.mode,
        report.succeeded(),
        report.skipped,
        report.failed
    );
    Ok(report)
}

fn generate_one(source: &Path, algorithm: Algorithm) -> Outcome {
    let sidecar = sidecar_path(source, algorithm);
    let written = digest_file(source, algorithm)
        .and_then(|hex| write_atomic(&sidecar, sidecar_contents(&hex).as_bytes()));
    match written {
        Ok(()) => Outcome::Generated {
            source: source.to_path_buf(),
            sidecar,
        },
        Err(e) => Outcome::failed(source, &e),
    }
}

fn delete_one(path: &Path, filter: Option<Algorithm>) -> Outcome {
    let skipped = |reason: String| Outcome::Skipped {
        path: path.to_path_buf(),
        reason,
    };
    match (is_sidecar(path), filter) {
        (None, _) => skipped("not a sidecar file".to_string()),
        (Some((_, found)), Some(wanted)) if found != wanted => {
            skipped(format!("not a {} sidecar", wanted))
        }
        _ => match fs::remove_file(path) {
            Ok(()) => Outcome::Deleted {
                sidecar: path.to_path_buf(),
            },
            Err(e) => Outcome::failed(path, &Error::remove(path, e)),
        },
    }
}

/// Replace `dest` with `bytes` through a temporary file in the same directory.
fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |e| Error::write(dest, e);

    let mut temp_file = tempfile::Builder::new()
        .prefix(".hashside-")
        .tempfile_in(dir)
        .map_err(io_err)?;
    temp_file.write_all(bytes).map_err(io_err)?;
    temp_file.flush().map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(io_err)?;
    }

    temp_file.persist(dest).map_err(|e| io_err(e.error))?;
    Ok(())
}

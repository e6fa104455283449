//! # Hashside Core
//!
//! Generates and removes digest sidecar files.
//!
//! For every eligible file under a target, a generate run writes
//! `<file>.<algorithm>` next to it, holding the lowercase hex digest of the
//! file's contents and a trailing newline. A delete run removes those
//! sidecars again, honoring the same exclusion patterns, so generating and
//! then deleting with the same options leaves the tree as it was.
//!
//! ## Features
//!
//! - Eight algorithms: md5, sha1, sha224, sha256, sha384, sha512, blake2b, blake2s
//! - Bounded-memory chunked hashing
//! - Sidecars are never hashed, so repeated runs never stack suffixes
//! - Glob exclusion patterns that prune whole directories
//! - Per-file failures are reported and never abort the run
//!
//! ## Example
//!
//! ```no_run
//! use hashside_core::{Algorithm, Mode, RunOptions, Target};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RunOptions::new(Target::Directory("./docs".into()))
//!     .with_algorithm(Some(Algorithm::Sha256))
//!     .with_ignore(["*.pyc", "__pycache__"]);
//!
//! let report = hashside_core::run(&options)?;
//! println!("Generated {} sidecars", report.generated);
//!
//! // Remove them again
//! let report = hashside_core::run(&options.with_mode(Mode::Delete))?;
//! println!("Deleted {} sidecars", report.deleted);
//! # Ok(())
//! # }
//! ```

mod error;
mod hash;
mod pattern;
mod run;
mod sidecar;
mod walk;

pub use error::{Error, Result};
pub use hash::{Algorithm, CHUNK_SIZE, digest_bytes, digest_file, digest_reader};
pub use pattern::{Pattern, PatternMatcher};
pub use run::{Mode, Outcome, Report, RunOptions, Target, run, run_with};
pub use sidecar::{is_sidecar, sidecar_contents, sidecar_path};
pub use walk::{Selection, TreeWalker, Walk};

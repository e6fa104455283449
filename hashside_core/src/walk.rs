//! Candidate discovery under a file or directory root.

use crate::error::{Error, Result};
use crate::hash::Algorithm;
use crate::pattern::PatternMatcher;
use crate::sidecar::is_sidecar;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which files a walk yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Files to hash: everything that is not already a sidecar.
    Sources,
    /// Existing sidecars, optionally only those of one algorithm.
    Sidecars(Option<Algorithm>),
}

impl Selection {
    fn accepts(&self, path: &Path) -> bool {
        match (self, is_sidecar(path)) {
            (Selection::Sources, sidecar) => sidecar.is_none(),
            (Selection::Sidecars(_), None) => false,
            (Selection::Sidecars(filter), Some((_, algorithm))) => {
                filter.is_none_or(|wanted| wanted == algorithm)
            }
        }
    }
}

/// Enumerates candidate files below a root.
///
/// Directory entries are visited in file-name order. Excluded directories
/// are pruned without being read. The walker holds no state between runs;
/// calling [`TreeWalker::walk`] again starts a fresh traversal.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    recursive: bool,
    matcher: PatternMatcher,
    selection: Selection,
}

impl TreeWalker {
    /// Create a recursive walker with no exclusions, selecting sources.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: true,
            matcher: PatternMatcher::default(),
            selection: Selection::Sources,
        }
    }

    /// Enable or disable descent into subdirectories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the exclusion patterns.
    pub fn with_matcher(mut self, matcher: PatternMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set which files are yielded.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// The walk root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a lazy traversal.
    ///
    /// A file root yields itself unless its name is excluded or, when
    /// selecting sources, it is a sidecar. A file root is yielded even if it
    /// is not a sidecar when selecting sidecars, so the caller can report it.
    pub fn walk(&self) -> Walk {
        let source = if self.root.is_dir() {
            Source::Tree {
                inner: self.build_tree_walk(),
                root: self.root.clone(),
                selection: self.selection,
            }
        } else {
            Source::Single(self.single_file())
        };
        Walk { source }
    }

    fn single_file(&self) -> Option<PathBuf> {
        let name = self.root.file_name().map(Path::new).unwrap_or(&self.root);
        if self.matcher.matches(name) {
            warn!("Target excluded by ignore patterns: {}", self.root.display());
            return None;
        }
        if self.selection == Selection::Sources && is_sidecar(&self.root).is_some() {
            warn!("Target is itself a sidecar, not hashing: {}", self.root.display());
            return None;
        }
        Some(self.root.clone())
    }

    fn build_tree_walk(&self) -> ignore::Walk {
        let root = self.root.clone();
        let matcher = self.matcher.clone();

        ignore::WalkBuilder::new(&self.root)
            .standard_filters(false) // No .gitignore, no hidden-file skipping
            .follow_links(false)
            .max_depth(if self.recursive { None } else { Some(1) })
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                if matcher.matches(rel) {
                    debug!("Excluded: {}", entry.path().display());
                    return false;
                }
                true
            })
            .build()
    }
}

/// Lazy sequence of candidate file paths produced by [`TreeWalker::walk`].
pub struct Walk {
    source: Source,
}

enum Source {
    Single(Option<PathBuf>),
    Tree {
        inner: ignore::Walk,
        root: PathBuf,
        selection: Selection,
    },
}

impl Iterator for Walk {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            Source::Single(path) => path.take().map(Ok),
            Source::Tree {
                inner,
                root,
                selection,
            } => loop {
                let entry = match inner.next()? {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(Error::from_walk(e, root))),
                };
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                let path = entry.into_path();
                if selection.accepts(&path) {
                    debug!("Candidate: {}", path.display());
                    return Some(Ok(path));
                }
            },
        }
    }
}

//! Mapping between source files and their digest sidecars.
//!
//! The sidecar of `file.txt` under `sha256` is `file.txt.sha256`, next to
//! the source. Classification is a pure function of the path, which is what
//! keeps generation from ever hashing its own output.

use crate::hash::Algorithm;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Sidecar path for `source` under `algorithm`: the full file name with
/// `.<algorithm>` appended.
pub fn sidecar_path(source: &Path, algorithm: Algorithm) -> PathBuf {
    let mut name: OsString = source.as_os_str().to_owned();
    name.push(".");
    name.push(algorithm.as_str());
    PathBuf::from(name)
}

/// Classify `path` as a sidecar.
///
/// Returns the source path and algorithm when the final suffix is exactly a
/// recognized algorithm identifier and something precedes it.
pub fn is_sidecar(path: &Path) -> Option<(PathBuf, Algorithm)> {
    // `extension` is `None` for names like `.sha256`, which have no stem.
    let algorithm = Algorithm::from_suffix(path.extension()?.to_str()?)?;
    let stem = path.file_stem()?;
    Some((path.with_file_name(stem), algorithm))
}

/// Sidecar content: the digest followed by a single newline.
pub fn sidecar_contents(hex_digest: &str) -> String {
    format!("{}\n", hex_digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path_appends_to_full_name() {
        assert_eq!(
            sidecar_path(Path::new("file.txt"), Algorithm::Sha256),
            PathBuf::from("file.txt.sha256")
        );
        assert_eq!(
            sidecar_path(Path::new("t/sub/b.txt"), Algorithm::Md5),
            PathBuf::from("t/sub/b.txt.md5")
        );
        assert_eq!(
            sidecar_path(Path::new("Makefile"), Algorithm::Blake2b),
            PathBuf::from("Makefile.blake2b")
        );
    }

    #[test]
    fn test_is_sidecar() {
        assert_eq!(
            is_sidecar(Path::new("t/a.txt.sha256")),
            Some((PathBuf::from("t/a.txt"), Algorithm::Sha256))
        );
        assert_eq!(
            is_sidecar(Path::new("archive.tar.gz.blake2s")),
            Some((PathBuf::from("archive.tar.gz"), Algorithm::Blake2s))
        );
        assert_eq!(
            is_sidecar(Path::new(".bashrc.sha1")),
            Some((PathBuf::from(".bashrc"), Algorithm::Sha1))
        );
    }

    #[test]
    fn test_not_sidecar() {
        assert_eq!(is_sidecar(Path::new("a.txt")), None);
        assert_eq!(is_sidecar(Path::new("a.txt.SHA256")), None);
        assert_eq!(is_sidecar(Path::new("a.sha3-256")), None);
        assert_eq!(is_sidecar(Path::new("a.sha256.bak")), None);
        assert_eq!(is_sidecar(Path::new(".sha256")), None);
        assert_eq!(is_sidecar(Path::new("sha256")), None);
        assert_eq!(is_sidecar(Path::new("")), None);
    }

    #[test]
    fn test_sidecar_of_sidecar_not_produced_by_classifier() {
        // A sidecar classifies as a sidecar, so it is never a hashing target.
        let first = sidecar_path(Path::new("a.txt"), Algorithm::Sha256);
        assert!(is_sidecar(&first).is_some());
    }

    #[test]
    fn test_sidecar_contents() {
        assert_eq!(sidecar_contents("abc123"), "abc123\n");
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Naming round-trip: classification recovers the source and algorithm.
        #[test]
        fn prop_roundtrip(
            dirs in prop::collection::vec("[a-zA-Z0-9_-]{1,8}", 0..4),
            name in "\\.?[a-zA-Z0-9_ -]{1,12}(\\.[a-z0-9]{1,6}){0,2}",
            algo in prop::sample::select(Algorithm::ALL.to_vec()),
        ) {
            let mut source = PathBuf::new();
            for d in &dirs {
                source.push(d);
            }
            source.push(&name);

            let sidecar = sidecar_path(&source, algo);
            prop_assert_eq!(is_sidecar(&sidecar), Some((source, algo)));
        }

        /// Sidecars of sidecars are still sidecars, stripping one suffix.
        #[test]
        fn prop_nested_sidecar_strips_one_level(
            name in "[a-z]{1,8}\\.[a-z]{1,3}",
            a in prop::sample::select(Algorithm::ALL.to_vec()),
            b in prop::sample::select(Algorithm::ALL.to_vec()),
        ) {
            let once = sidecar_path(Path::new(&name), a);
            let twice = sidecar_path(&once, b);
            prop_assert_eq!(is_sidecar(&twice), Some((once, b)));
        }
    }
}

//! Digest computation over the supported algorithm set.

use crate::error::{Error, Result};
use sha2::Digest;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Read size used when streaming a file through a hasher.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Supported hash algorithms.
///
/// The identifier returned by [`Algorithm::as_str`] doubles as the sidecar
/// file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    /// BLAKE2b with 512-bit output.
    Blake2b,
    /// BLAKE2s with 256-bit output.
    Blake2s,
}

impl Algorithm {
    /// Every supported algorithm, in canonical order.
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Blake2b,
        Algorithm::Blake2s,
    ];

    /// Returns the lowercase identifier (also the sidecar suffix).
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Blake2b => "blake2b",
            Algorithm::Blake2s => "blake2s",
        }
    }

    /// Match an identifier exactly, as it appears in a sidecar suffix.
    pub fn from_suffix(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// Length of the hex digest in characters.
    pub fn hex_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha1 => 40,
            Algorithm::Sha224 => 56,
            Algorithm::Sha256 | Algorithm::Blake2s => 64,
            Algorithm::Sha384 => 96,
            Algorithm::Sha512 | Algorithm::Blake2b => 128,
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parse a user-supplied identifier, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_suffix(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::unsupported_algorithm(s))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hash data from a reader, returning the lowercase hex digest.
///
/// The reader is consumed in [`CHUNK_SIZE`] pieces, so memory use does not
/// depend on the input length.
pub fn digest_reader<R: Read>(reader: R, algorithm: Algorithm) -> io::Result<String> {
    match algorithm {
        Algorithm::Md5 => stream::<md5::Md5, R>(reader),
        Algorithm::Sha1 => stream::<sha1::Sha1, R>(reader),
        Algorithm::Sha224 => stream::<sha2::Sha224, R>(reader),
        Algorithm::Sha256 => stream::<sha2::Sha256, R>(reader),
        Algorithm::Sha384 => stream::<sha2::Sha384, R>(reader),
        Algorithm::Sha512 => stream::<sha2::Sha512, R>(reader),
        Algorithm::Blake2b => stream::<blake2::Blake2b512, R>(reader),
        Algorithm::Blake2s => stream::<blake2::Blake2s256, R>(reader),
    }
}

/// Hash a file, returning the lowercase hex digest.
pub fn digest_file(path: &Path, algorithm: Algorithm) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::read(path, e))?;
    digest_reader(file, algorithm).map_err(|e| Error::read(path, e))
}

/// Hash an in-memory buffer, returning the lowercase hex digest.
pub fn digest_bytes(data: &[u8], algorithm: Algorithm) -> String {
    match algorithm {
        Algorithm::Md5 => hex::encode(md5::Md5::digest(data)),
        Algorithm::Sha1 => hex::encode(sha1::Sha1::digest(data)),
        Algorithm::Sha224 => hex::encode(sha2::Sha224::digest(data)),
        Algorithm::Sha256 => hex::encode(sha2::Sha256::digest(data)),
        Algorithm::Sha384 => hex::encode(sha2::Sha384::digest(data)),
        Algorithm::Sha512 => hex::encode(sha2::Sha512::digest(data)),
        Algorithm::Blake2b => hex::encode(blake2::Blake2b512::digest(data)),
        Algorithm::Blake2s => hex::encode(blake2::Blake2s256::digest(data)),
    }
}

fn stream<D: Digest, R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

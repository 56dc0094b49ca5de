//! Content fingerprints using BLAKE3, and the file names derived from them.

use crate::error::Result;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Fingerprint size in bytes (BLAKE3 produces 256-bit hashes).
const FINGERPRINT_SIZE: usize = 32;

/// A 32-byte BLAKE3 digest of a file's content.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_SIZE]);

impl Fingerprint {
    /// Convert to lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Fingerprint raw bytes.
    pub fn of_bytes(data: &[u8]) -> Self {
        Fingerprint(*blake3::hash(data).as_bytes())
    }

    /// Fingerprint everything a reader yields.
    pub fn of_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut hasher = blake3::Hasher::new();
        std::io::copy(&mut reader, &mut hasher)?;
        Ok(Fingerprint(*hasher.finalize().as_bytes()))
    }

    /// Fingerprint the full content of a file.
    pub fn of_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::of_reader(file)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Hex fingerprint of the file at `path`.
pub fn fingerprint(path: &Path) -> Result<String> {
    Ok(Fingerprint::of_file(path)?.to_hex())
}

/// Extension of a file name: everything from the last `.`, inclusive.
///
/// Returns an empty string when the name has no `.`.
pub fn extension_of(name: &str) -> &str {
    name.rfind('.').map_or("", |idx| &name[idx..])
}

/// Published name for a file: `<fingerprint><extension of original>`.
pub fn hashed_name(fingerprint: &Fingerprint, original: &str) -> String {
    format!("{}{}", fingerprint.to_hex(), extension_of(original))
}

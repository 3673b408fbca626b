//! Common types used across md5verify
//!
//! This module provides shared type definitions used by multiple crates.

use serde::{Deserialize, Serialize};

/// Hex digest of a file's contents
///
/// Stored lowercase so that `D41D8CD9...` and `d41d8cd9...` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Create a checksum from a hex digest, normalizing case and whitespace
    pub fn new(hex: impl AsRef<str>) -> Self {
        Self(hex.as_ref().trim().to_ascii_lowercase())
    }

    /// Get the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the digest is non-empty and made only of hex digits
    pub fn is_hex(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Checksum {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Checksum {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A single (path, checksum) line parsed from a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path of the file as written in the manifest (after any root stripping)
    pub path: String,
    /// Digest of the file's contents
    pub checksum: Checksum,
    /// 1-based line number in the source manifest
    pub line: usize,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>, checksum: impl Into<Checksum>, line: usize) -> Self {
        Self {
            path: path.into(),
            checksum: checksum.into(),
            line,
        }
    }
}

/// One of the two manifests being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "1" => Ok(Side::A),
            "b" | "2" => Ok(Side::B),
            _ => Err(format!("Unknown side: {} (expected a or b)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_case_insensitive() {
        assert_eq!(Checksum::new("D41D8CD98F00B204"), Checksum::new("d41d8cd98f00b204"));
    }

    #[test]
    fn test_checksum_trims() {
        assert_eq!(Checksum::new("  abc \n").as_str(), "abc");
    }

    #[test]
    fn test_checksum_is_hex() {
        assert!(Checksum::new("d41d8cd98f00b204e9800998ecf8427e").is_hex());
        assert!(!Checksum::new("not-a-hash").is_hex());
        assert!(!Checksum::new("").is_hex());
    }

    #[test]
    fn test_entry_new_normalizes_checksum() {
        let entry = ManifestEntry::new("./SR2324/raw/ctd.hex", "ABC", 1);
        assert_eq!(entry.checksum.as_str(), "abc");
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("a".parse::<Side>(), Ok(Side::A));
        assert_eq!("B".parse::<Side>(), Ok(Side::B));
        assert_eq!("1".parse::<Side>(), Ok(Side::A));
        assert_eq!("2".parse::<Side>(), Ok(Side::B));
        assert!("3".parse::<Side>().is_err());
    }
}

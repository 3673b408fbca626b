//! md5verify-parsers
//!
//! Parsers for the checksum manifests produced by md5deep, hashdeep and
//! md5sum-style tools.
//!
//! # Supported Formats
//!
//! | Format    | Layout                                   | Notes |
//! |-----------|------------------------------------------|-------|
//! | hashdeep  | `%%%%` header, `size,md5,sha256,filename` | header picks the checksum column |
//! | md5deep   | comma-separated, path last               | defaults to hashdeep's 4 columns |
//! | md5sum    | `<digest>  <path>`                       | OpenVDM `md5_summary.txt` too |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use md5verify_parsers::{ManifestParser, Parser};
//!
//! let parser = ManifestParser::new();
//! let manifest = parser.parse_file(Path::new("SR2324.md5deep.txt")).unwrap();
//!
//! println!("Found {} entries", manifest.len());
//! ```

pub mod traits;
pub mod manifest;
pub mod logging;

// Re-export main types
pub use traits::{Parser, ParseError, ParseResult, ParseOptions};

pub use manifest::{ManifestParser, Manifest, ColumnLayout};

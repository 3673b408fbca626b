// md5verify-parsers/src/manifest/mod.rs
//! md5deep / hashdeep Manifest Parser
//!
//! A manifest lists one file per line together with its digest. Two
//! families of output are understood:
//!
//! ```text
//! %%%% HASHDEEP-1.0
//! %%%% size,md5,sha256,filename
//! ## Invoked from: /mnt/cruise
//! ## $ hashdeep -r .
//! ##
//! 1024,d41d8cd98f00b204e9800998ecf8427e,e3b0c44298fc1c14...,./SR2324/ctd/001.hex
//! ```
//!
//! and the two-column `<digest> <path>` form written by `md5sum` and
//! OpenVDM's `md5_summary.txt`. Blank lines and lines starting with `#` are
//! skipped. A `%%%%` column header, when present, decides which column holds
//! the checksum; otherwise `size,md5,sha256,filename` is assumed.

mod format;
mod map;
pub mod path;

pub use format::{ColumnLayout, LineKind, COMMENT_PREFIX, HEADER_PREFIX};
pub use map::Manifest;

use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use md5verify_core::{Checksum, ManifestEntry};

use crate::logging::instrument_parse;
use crate::traits::{ParseError, ParseOptions, ParseResult, Parser};
use crate::{log_parse_complete, log_parse_error, log_parse_start};

/// Parser for md5deep / hashdeep manifests
#[derive(Debug, Clone, Default)]
pub struct ManifestParser;

impl ManifestParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a reader into the individual entries, in file order
    ///
    /// Duplicates are kept; [`Manifest`] decides which one wins.
    pub fn parse_entries<R: BufRead>(
        &self,
        mut reader: R,
        options: &ParseOptions,
    ) -> ParseResult<(Vec<ManifestEntry>, usize)> {
        let mut layout = ColumnLayout::default();
        let mut entries = Vec::new();
        let mut skipped = 0;
        let mut buf = Vec::new();
        let mut line = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line += 1;

            let raw = match std::str::from_utf8(&buf) {
                Ok(raw) => raw,
                Err(_) if options.lenient => {
                    tracing::warn!(line, "Skipping manifest line that is not valid UTF-8");
                    skipped += 1;
                    continue;
                }
                Err(_) => return Err(ParseError::InvalidUtf8 { line }),
            };

            match LineKind::classify(raw) {
                LineKind::Skip => continue,
                LineKind::Header(header) => {
                    if header.contains(',') {
                        layout = ColumnLayout::from_header(header)?;
                        tracing::debug!(?layout, "Using column layout from header");
                    } else {
                        tracing::trace!(header, "Ignoring header line");
                    }
                }
                LineKind::Data(text) => match self.parse_line(&layout, text, line, options) {
                    Ok(entry) => entries.push(entry),
                    Err(e) if options.lenient && e.is_line_error() => {
                        tracing::warn!(line, error = %e, "Skipping malformed manifest line");
                        skipped += 1;
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        Ok((entries, skipped))
    }

    fn parse_line(
        &self,
        layout: &ColumnLayout,
        text: &str,
        line: usize,
        options: &ParseOptions,
    ) -> ParseResult<ManifestEntry> {
        let (hash, raw_path) = layout.split_line(text, line)?;

        if hash.is_empty() {
            return Err(ParseError::MissingField { line, field: "checksum".to_string() });
        }
        if raw_path.is_empty() {
            return Err(ParseError::MissingField { line, field: "path".to_string() });
        }

        let checksum = Checksum::new(hash);
        if !checksum.is_hex() {
            return Err(ParseError::InvalidChecksum { line, value: hash.to_string() });
        }

        let normalized = path::normalize_path(raw_path);
        let path = path::strip_components(&normalized, options.strip_components);

        Ok(ManifestEntry { path, checksum, line })
    }
}

impl Parser for ManifestParser {
    type Output = Manifest;

    fn extensions(&self) -> &[&str] {
        &["txt", "md5", "md5deep", "hashdeep", "csv"]
    }

    fn name(&self) -> &str {
        "md5deep"
    }

    fn parse_with_options<R: BufRead>(
        &self,
        reader: R,
        options: &ParseOptions,
    ) -> ParseResult<Manifest> {
        let (entries, skipped) = self.parse_entries(reader, options)?;
        let mut manifest = Manifest::from_entries(entries);
        manifest.skipped = skipped;
        Ok(manifest)
    }

    fn parse_file_with_options(&self, path: &Path, options: &ParseOptions) -> ParseResult<Manifest> {
        log_parse_start!(self.name(), path);
        let start = Instant::now();

        let result = instrument_parse(self.name(), || -> ParseResult<Manifest> {
            let file = crate::traits::open_file(path)?;
            self.parse_with_options(std::io::BufReader::new(file), options)
        });

        match result {
            Ok(manifest) => {
                log_parse_complete!(self.name(), start.elapsed(), manifest.len());
                Ok(manifest.with_source(path))
            }
            Err(e) => {
                log_parse_error!(self.name(), e);
                Err(e.with_context(format!("while parsing {}", path.display())))
            }
        }
    }
}

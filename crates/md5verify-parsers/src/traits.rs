// md5verify-parsers/src/traits.rs
//! Core traits defining the parser interface for manifest formats.
//!
//! This module establishes a unified parsing interface that provides:
//! - Consistent error handling across all formats
//! - Parsing from any buffered reader or straight from a file path
//! - Shared parse options (strict/lenient, root stripping)

use std::io::BufRead;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    TooFewFields { line: usize, found: usize, expected: usize },

    #[error("Line {line}: missing required field: {field}")]
    MissingField { line: usize, field: String },

    #[error("Line {line}: invalid checksum '{value}'")]
    InvalidChecksum { line: usize, value: String },

    #[error("Line {line}: not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("{context}: {source}")]
    Nested {
        context: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Wrap this error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ParseError::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Line number the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::TooFewFields { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::InvalidChecksum { line, .. }
            | ParseError::InvalidUtf8 { line } => Some(*line),
            ParseError::Nested { source, .. } => source.line(),
            _ => None,
        }
    }

    /// Whether this error describes a single malformed data line
    ///
    /// Only these are downgraded to warnings in lenient mode.
    pub fn is_line_error(&self) -> bool {
        matches!(
            self,
            ParseError::TooFewFields { .. }
                | ParseError::MissingField { .. }
                | ParseError::InvalidChecksum { .. }
                | ParseError::InvalidUtf8 { .. }
        )
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        match self {
            ParseError::FileNotFound(_) => true,
            ParseError::Nested { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Configuration options for parsing
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Skip malformed lines with a warning instead of failing the whole file
    pub lenient: bool,
    /// Number of leading directory components to drop from every path
    pub strip_components: usize,
}

impl ParseOptions {
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn strip_components(mut self, count: usize) -> Self {
        self.strip_components = count;
        self
    }
}

/// Core trait for all manifest parsers
pub trait Parser: Send + Sync {
    /// The parsed output type
    type Output: Send + Sync;

    /// Returns the file extensions this parser usually sees (e.g., ["md5"])
    fn extensions(&self) -> &[&str];

    /// Returns a human-readable name for this parser
    fn name(&self) -> &str;

    /// Parse from a reader with default options
    fn parse<R: BufRead>(&self, reader: R) -> ParseResult<Self::Output> {
        self.parse_with_options(reader, &ParseOptions::default())
    }

    /// Parse from a reader with custom options
    fn parse_with_options<R: BufRead>(
        &self,
        reader: R,
        options: &ParseOptions,
    ) -> ParseResult<Self::Output>;

    /// Parse from a file path
    fn parse_file(&self, path: &Path) -> ParseResult<Self::Output> {
        self.parse_file_with_options(path, &ParseOptions::default())
    }

    /// Parse from a file path with options
    fn parse_file_with_options(
        &self,
        path: &Path,
        options: &ParseOptions,
    ) -> ParseResult<Self::Output> {
        let file = open_file(path)?;
        let reader = std::io::BufReader::new(file);
        self.parse_with_options(reader, options)
    }

    /// Check if this parser recognizes the file by extension
    fn can_parse(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            return self.extensions().iter().any(|e| e.to_lowercase() == ext_str);
        }
        false
    }
}

/// Open a file, reporting a missing path as [`ParseError::FileNotFound`]
pub fn open_file(path: &Path) -> ParseResult<std::fs::File> {
    std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ParseError::FileNotFound(path.to_path_buf()),
        _ => ParseError::Io(e),
    })
}

// md5verify-parsers/src/manifest/format.rs
//! Column layouts and line splitting for md5deep / hashdeep output

use crate::traits::{ParseError, ParseResult};

/// Prefix of hashdeep header lines
pub const HEADER_PREFIX: &str = "%%%%";

/// Prefix of comment lines
pub const COMMENT_PREFIX: char = '#';

/// Hash columns hashdeep can emit, in preference order for comparison
const HASH_COLUMNS: &[&str] = &["md5", "sha1", "sha256", "tiger", "whirlpool"];

/// Position of the checksum and path fields in a comma-separated line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Total number of comma-separated columns
    pub columns: usize,
    /// Index of the checksum column
    pub checksum_col: usize,
    /// Index of the path column; always the last one
    pub path_col: usize,
}

impl Default for ColumnLayout {
    /// `size,md5,sha256,filename`, the layout of a default hashdeep run
    fn default() -> Self {
        Self {
            columns: 4,
            checksum_col: 1,
            path_col: 3,
        }
    }
}

impl ColumnLayout {
    /// Build a layout from a hashdeep column header such as
    /// `size,md5,sha256,filename` (the `%%%%` prefix already removed)
    pub fn from_header(header: &str) -> ParseResult<Self> {
        let names: Vec<String> = header
            .split(',')
            .map(|n| n.trim().to_lowercase())
            .collect();

        let path_col = names
            .iter()
            .position(|n| n == "filename")
            .ok_or_else(|| ParseError::InvalidHeader(format!("no filename column in '{}'", header)))?;

        if path_col != names.len() - 1 {
            return Err(ParseError::InvalidHeader(format!(
                "filename must be the last column in '{}'",
                header
            )));
        }

        let checksum_col = HASH_COLUMNS
            .iter()
            .find_map(|hash| names.iter().position(|n| n == hash))
            .ok_or_else(|| ParseError::InvalidHeader(format!("no hash column in '{}'", header)))?;

        Ok(Self {
            columns: names.len(),
            checksum_col,
            path_col,
        })
    }

    /// Split a data line into `(checksum, path)`
    ///
    /// A line whose first whitespace-separated token is a bare hex digest is
    /// `<checksum> <path>` (md5sum / OpenVDM summary), whatever commas the
    /// path holds. hashdeep columns never contain whitespace, so their first
    /// token always runs into a comma. Other lines use this layout; the path
    /// is the last column and may itself contain commas.
    pub fn split_line<'a>(&self, text: &'a str, line: usize) -> ParseResult<(&'a str, &'a str)> {
        if let Some(pair) = split_two_column(text) {
            return Ok(pair);
        }

        let fields: Vec<&str> = text.splitn(self.columns, ',').collect();
        if fields.len() == self.columns {
            return Ok((fields[self.checksum_col].trim(), fields[self.path_col].trim()));
        }

        Err(ParseError::TooFewFields {
            line,
            found: fields.len(),
            expected: self.columns,
        })
    }
}

/// Split `<checksum><whitespace><path>`, accepting md5sum's `*` binary marker
fn split_two_column(text: &str) -> Option<(&str, &str)> {
    let (hash, rest) = text.trim().split_once(char::is_whitespace)?;
    if hash.is_empty() || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let path = rest.trim_start();
    let path = path.strip_prefix('*').unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    Some((hash, path.trim_end()))
}

/// Classification of one raw manifest line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank or `#` comment
    Skip,
    /// `%%%%` header; holds the text after the prefix
    Header(&'a str),
    /// Anything else
    Data(&'a str),
}

impl<'a> LineKind<'a> {
    pub fn classify(raw: &'a str) -> Self {
        let text = raw.trim();
        if text.is_empty() || text.starts_with(COMMENT_PREFIX) {
            LineKind::Skip
        } else if let Some(rest) = text.strip_prefix(HEADER_PREFIX) {
            LineKind::Header(rest.trim())
        } else {
            LineKind::Data(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = ColumnLayout::default();
        let (hash, path) = layout
            .split_line("1024,d41d8cd98f00b204e9800998ecf8427e,e3b0c442,./data/a.txt", 1)
            .unwrap();
        assert_eq!(hash, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(path, "./data/a.txt");
    }

    #[test]
    fn test_path_with_commas() {
        let layout = ColumnLayout::default();
        let (_, path) = layout.split_line("1,aa,bb,./a,b,c.txt", 1).unwrap();
        assert_eq!(path, "./a,b,c.txt");
    }

    #[test]
    fn test_header_md5_only() {
        let layout = ColumnLayout::from_header("size,md5,filename").unwrap();
        assert_eq!(layout, ColumnLayout { columns: 3, checksum_col: 1, path_col: 2 });
    }

    #[test]
    fn test_header_prefers_md5() {
        let layout = ColumnLayout::from_header("size,sha256,md5,filename").unwrap();
        assert_eq!(layout.checksum_col, 2);
    }

    #[test]
    fn test_header_falls_back_to_other_hash() {
        let layout = ColumnLayout::from_header("size,sha256,filename").unwrap();
        assert_eq!(layout.checksum_col, 1);
    }

    #[test]
    fn test_header_without_filename() {
        assert!(matches!(
            ColumnLayout::from_header("size,md5"),
            Err(ParseError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_header_filename_not_last() {
        assert!(ColumnLayout::from_header("filename,md5").is_err());
    }

    #[test]
    fn test_two_column_line() {
        let layout = ColumnLayout::default();
        let (hash, path) = layout.split_line("abc123  ./raw/file 1.dat", 1).unwrap();
        assert_eq!(hash, "abc123");
        assert_eq!(path, "./raw/file 1.dat");
    }

    #[test]
    fn test_two_column_path_with_commas() {
        let layout = ColumnLayout::default();

        let (hash, path) = layout
            .split_line("d41d8cd98f00b204e9800998ecf8427e  ./x,ab,cd,e.txt", 1)
            .unwrap();
        assert_eq!((hash, path), ("d41d8cd98f00b204e9800998ecf8427e", "./x,ab,cd,e.txt"));

        let (hash, path) = layout
            .split_line("d41d8cd98f00b204e9800998ecf8427e  ./report, final, v2, signed.pdf", 1)
            .unwrap();
        assert_eq!(hash, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(path, "./report, final, v2, signed.pdf");
    }

    #[test]
    fn test_comma_line_with_spaced_path_keeps_layout() {
        let layout = ColumnLayout::default();
        let (hash, path) = layout.split_line("1024,aa,bb,./raw/file 1.dat", 1).unwrap();
        assert_eq!((hash, path), ("aa", "./raw/file 1.dat"));

        let md5_only = ColumnLayout::from_header("md5,filename").unwrap();
        let (hash, path) = md5_only.split_line("abc123,./a b,c.txt", 1).unwrap();
        assert_eq!((hash, path), ("abc123", "./a b,c.txt"));
    }

    #[test]
    fn test_two_column_binary_marker() {
        let (hash, path) = split_two_column("abc123 *img.bin").unwrap();
        assert_eq!((hash, path), ("abc123", "img.bin"));
    }

    #[test]
    fn test_too_few_fields() {
        let layout = ColumnLayout::default();
        let err = layout.split_line("1024,abc", 5).unwrap_err();
        assert!(matches!(err, ParseError::TooFewFields { line: 5, found: 2, expected: 4 }));
    }

    #[test]
    fn test_classify() {
        assert_eq!(LineKind::classify(""), LineKind::Skip);
        assert_eq!(LineKind::classify("## Invoked from: /data"), LineKind::Skip);
        assert_eq!(LineKind::classify("%%%% HASHDEEP-1.0"), LineKind::Header("HASHDEEP-1.0"));
        assert_eq!(LineKind::classify(" 1,a,b,c \r"), LineKind::Data("1,a,b,c"));
    }
}

//! Human-readable and JSON reports for a [`ComparisonResult`]

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use md5verify_core::Side;

use crate::diff::{ComparisonResult, DiffEntry, Summary};
use crate::similar::AlignmentHint;

/// Output format for the report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Reporter configuration
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// List matched entries too, not just the differences
    pub show_all: bool,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    manifest_a: &'a str,
    manifest_b: &'a str,
    mode: crate::diff::CompareMode,
    identical: bool,
    summary: Summary,
    mismatched: &'a [DiffEntry],
    only_in_a: &'a [DiffEntry],
    only_in_b: &'a [DiffEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<&'a [DiffEntry]>,
    #[serde(skip_serializing_if = "is_empty_slice")]
    alignment_hints: &'a [AlignmentHint],
}

/// Writes comparison reports
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Write the report in the configured format
    pub fn write<W: Write>(&self, result: &ComparisonResult, out: &mut W) -> io::Result<()> {
        match self.options.format {
            OutputFormat::Text => self.write_text(result, out),
            OutputFormat::Json => {
                let json = self.to_json(result);
                let text = serde_json::to_string_pretty(&json).map_err(io::Error::other)?;
                writeln!(out, "{}", text)
            }
        }
    }

    /// Render the report to a string
    pub fn render(&self, result: &ComparisonResult) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write(result, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Build the JSON document for a result
    pub fn to_json(&self, result: &ComparisonResult) -> serde_json::Value {
        let report = JsonReport {
            manifest_a: &result.source_a,
            manifest_b: &result.source_b,
            mode: result.mode,
            identical: result.is_identical(),
            summary: result.summary(),
            mismatched: &result.mismatched,
            only_in_a: &result.only_in_a,
            only_in_b: &result.only_in_b,
            matched: self.options.show_all.then_some(result.matched.as_slice()),
            alignment_hints: &result.hints,
        };
        serde_json::to_value(report).unwrap_or(serde_json::Value::Null)
    }

    fn write_text<W: Write>(&self, result: &ComparisonResult, out: &mut W) -> io::Result<()> {
        let summary = result.summary();

        writeln!(out, "Comparing manifests ({}):", result.mode)?;
        writeln!(out, "  A: {} ({} entries)", result.source_a, summary.entries_a)?;
        writeln!(out, "  B: {} ({} entries)", result.source_b, summary.entries_b)?;

        writeln!(out, "\nSummary:")?;
        writeln!(out, "  Matched:     {:>8}", summary.matched)?;
        writeln!(out, "  Mismatched:  {:>8}", summary.mismatched)?;
        writeln!(out, "  Only in A:   {:>8}", summary.only_in_a)?;
        writeln!(out, "  Only in B:   {:>8}", summary.only_in_b)?;

        if !result.mismatched.is_empty() {
            writeln!(out, "\nMismatched files:")?;
            for entry in &result.mismatched {
                writeln!(
                    out,
                    "  ~ {}  (A: {}, B: {})",
                    entry.key,
                    display_checksum(entry.checksum_a.as_ref()),
                    display_checksum(entry.checksum_b.as_ref())
                )?;
            }
        }

        if !result.only_in_a.is_empty() {
            writeln!(out, "\nOnly in A:")?;
            for entry in &result.only_in_a {
                writeln!(out, "  - {}", describe(entry, Side::A))?;
            }
        }

        if !result.only_in_b.is_empty() {
            writeln!(out, "\nOnly in B:")?;
            for entry in &result.only_in_b {
                writeln!(out, "  + {}", describe(entry, Side::B))?;
            }
        }

        if self.options.show_all && !result.matched.is_empty() {
            writeln!(out, "\nMatched files:")?;
            for entry in &result.matched {
                writeln!(out, "  = {}", describe_matched(entry))?;
            }
        }

        if !result.hints.is_empty() {
            self.write_hints(&result.hints, out)?;
        }

        if result.is_identical() {
            writeln!(out, "\nResult: manifests are identical")?;
        } else {
            writeln!(out, "\nResult: manifests differ ({} differences)", summary.differences())?;
        }

        Ok(())
    }

    fn write_hints<W: Write>(&self, hints: &[AlignmentHint], out: &mut W) -> io::Result<()> {
        let mut roots: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for hint in hints {
            *roots.entry((hint.root_a.as_str(), hint.root_b.as_str())).or_default() += 1;
        }

        writeln!(out, "\nPossible root misalignment:")?;
        for ((root_a, root_b), count) in &roots {
            writeln!(out, "  A '{}' <-> B '{}' ({} files)", root_a, root_b, count)?;
        }

        if self.options.show_all {
            for hint in hints {
                writeln!(out, "    {} <-> {}", hint.path_a, hint.path_b)?;
            }
        }

        Ok(())
    }
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

fn display_checksum(checksum: Option<&md5verify_core::Checksum>) -> &str {
    checksum.map(|c| c.as_str()).unwrap_or("-")
}

/// `path  checksum`, or `checksum  [paths]` in checksum-only mode
fn describe(entry: &DiffEntry, side: Side) -> String {
    let paths = entry.paths(side);
    if paths.is_empty() {
        let checksum = match side {
            Side::A => entry.checksum_a.as_ref(),
            Side::B => entry.checksum_b.as_ref(),
        };
        format!("{}  {}", entry.key, display_checksum(checksum))
    } else {
        format!("{}  [{}]", entry.key, paths.join(", "))
    }
}

fn describe_matched(entry: &DiffEntry) -> String {
    if entry.paths_a.is_empty() && entry.paths_b.is_empty() {
        return describe(entry, Side::A);
    }
    format!(
        "{}  (A: [{}], B: [{}])",
        entry.key,
        entry.paths_a.join(", "),
        entry.paths_b.join(", ")
    )
}

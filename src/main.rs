//! verify_md5deep
//!
//! Compare two md5deep / hashdeep manifests of the same directory tree and
//! report files whose checksum or path differs.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use md5verify_core::Side;
use md5verify_parsers::logging::{self, TracingConfig};
use md5verify_parsers::{Manifest, ManifestParser, ParseOptions, Parser as ManifestParserTrait};
use md5verify_tools::{
    copy_difference, Comparator, CompareMode, CompareOptions, ComparisonResult, OutputFormat,
    Reporter, ReportOptions, DEFAULT_CUTOFF,
};

/// Compare two md5deep file listings
#[derive(Parser, Debug)]
#[command(name = "verify_md5deep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// md5deep file listing A
    manifest_a: PathBuf,

    /// md5deep file listing B
    manifest_b: PathBuf,

    /// Show all files, not only the differences
    #[arg(short = 'a')]
    all: bool,

    /// Only compare checksums, ignoring paths
    #[arg(short = 'f', conflicts_with = "paths_only")]
    checksums_only: bool,

    /// Only compare file paths, ignoring checksums
    #[arg(short = 'q')]
    paths_only: bool,

    /// Skip malformed lines with a warning instead of failing
    #[arg(long)]
    lenient: bool,

    /// Leading directory components to drop from paths in A
    #[arg(long, value_name = "N", default_value_t = 0)]
    strip_a: usize,

    /// Leading directory components to drop from paths in B
    #[arg(long, value_name = "N", default_value_t = 0)]
    strip_b: usize,

    /// Suggest root alignments for one-sided files with equal checksums
    #[arg(long)]
    hints: bool,

    /// Fraction of a path that may differ for an alignment hint
    #[arg(
        long,
        value_name = "F",
        default_value_t = DEFAULT_CUTOFF,
        value_parser = parse_cutoff,
        requires = "hints"
    )]
    cutoff: f64,

    /// Report format: text or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Copy the files that side a or b has and the other lacks into <dir>_update
    #[arg(short = 'c', long, value_name = "SIDE")]
    copy_diff: Option<Side>,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn compare_mode(&self) -> CompareMode {
        if self.checksums_only {
            CompareMode::ChecksumOnly
        } else if self.paths_only {
            CompareMode::PathOnly
        } else {
            CompareMode::Full
        }
    }

    fn parse_options(&self, side: Side) -> ParseOptions {
        let strip = match side {
            Side::A => self.strip_a,
            Side::B => self.strip_b,
        };
        ParseOptions::default().lenient(self.lenient).strip_components(strip)
    }

    fn manifest_path(&self, side: Side) -> &Path {
        match side {
            Side::A => &self.manifest_a,
            Side::B => &self.manifest_b,
        }
    }
}

/// A fraction in `0.0..=1.0`
fn parse_cutoff(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not a fraction between 0 and 1", s))
    }
}

fn setup_logging(verbosity: u8) {
    logging::init_with_config(TracingConfig::for_verbosity(verbosity));
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let a = load_manifest(cli, Side::A)?;
    let b = load_manifest(cli, Side::B)?;

    let comparator = Comparator::new(CompareOptions {
        mode: cli.compare_mode(),
        hint_cutoff: cli.hints.then_some(cli.cutoff),
    });
    let result = comparator.compare(&a, &b);

    let reporter = Reporter::new(ReportOptions {
        show_all: cli.all,
        format: cli.format,
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    reporter
        .write(&result, &mut out)
        .context("Failed to write report")?;
    out.flush()?;

    if let Some(ref output_path) = cli.output {
        write_json_report(&reporter, &result, output_path)?;
    }

    if let Some(side) = cli.copy_diff {
        cmd_copy_diff(cli, &result, side)?;
    }

    Ok(())
}

fn load_manifest(cli: &Cli, side: Side) -> Result<Manifest> {
    let path = cli.manifest_path(side);
    let parser = ManifestParser::new();

    if !parser.can_parse(path) {
        debug!(path = %path.display(), "Unrecognized manifest extension, parsing anyway");
    }

    let manifest = parser
        .parse_file_with_options(path, &cli.parse_options(side))
        .with_context(|| format!("Failed to load manifest {}", side))?;

    if !manifest.duplicates.is_empty() {
        warn!(
            manifest = %path.display(),
            count = manifest.duplicates.len(),
            "Manifest lists some paths more than once; the last occurrence was kept"
        );
    }
    if manifest.skipped > 0 {
        warn!(manifest = %path.display(), skipped = manifest.skipped, "Skipped malformed lines");
    }
    info!(manifest = %path.display(), entries = manifest.len(), "Loaded manifest {}", side);

    Ok(manifest)
}

fn write_json_report(reporter: &Reporter, result: &ComparisonResult, path: &Path) -> Result<()> {
    let report = reporter.to_json(result);
    fs::write(path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    eprintln!("Report written to: {}", path.display());
    Ok(())
}

fn cmd_copy_diff(cli: &Cli, result: &ComparisonResult, side: Side) -> Result<()> {
    let paths = result.differing_paths(side);
    let manifest = cli.manifest_path(side);

    match copy_difference(manifest, &paths)
        .with_context(|| format!("Failed to copy differences of manifest {}", side))?
    {
        Some(report) => eprintln!(
            "Copied {} files to {}",
            report.copied,
            report.target.display()
        ),
        None => eprintln!("Manifest {} has no differences - copy not created", side),
    }

    Ok(())
}

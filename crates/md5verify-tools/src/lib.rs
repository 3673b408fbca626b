//! md5verify-tools
//!
//! Everything that happens after two manifests are loaded: the set
//! comparison, root alignment hints, reporting, and copying the files one
//! side is missing.

pub mod diff;
pub mod similar;
pub mod report;
pub mod copy;

pub use diff::{Comparator, CompareMode, CompareOptions, ComparisonResult, DiffEntry, Summary};
pub use similar::{AlignmentHint, DEFAULT_CUTOFF};
pub use report::{OutputFormat, Reporter, ReportOptions};
pub use copy::{copy_difference, CopyReport};

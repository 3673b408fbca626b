//! Manifest comparison
//!
//! [`Comparator::compare`] walks both manifests' sorted key sets in a single
//! merge pass and files every key of A ∪ B under exactly one of matched,
//! mismatched, only-in-A or only-in-B. No path normalization happens here:
//! manifests rooted differently show up as one-sided entries.

use std::cmp::Ordering;
use std::iter::Peekable;

use serde::{Deserialize, Serialize};

use md5verify_core::{Checksum, Side};
use md5verify_parsers::Manifest;

use crate::similar::{self, AlignmentHint};

/// What two entries must share to count as the same file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    /// Same path and same checksum
    #[default]
    Full,
    /// Same checksum, wherever the file lives
    ChecksumOnly,
    /// Same path, whatever the contents
    PathOnly,
}

impl std::fmt::Display for CompareMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareMode::Full => f.write_str("path and checksum"),
            CompareMode::ChecksumOnly => f.write_str("checksum only"),
            CompareMode::PathOnly => f.write_str("path only"),
        }
    }
}

/// Comparator configuration
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub mode: CompareMode,
    /// Compute root alignment hints with this cutoff (fraction of a path
    /// that may be cut away); `None` disables them
    pub hint_cutoff: Option<f64>,
}

/// One key of the comparison together with what each side holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// The path, or the checksum in [`CompareMode::ChecksumOnly`]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_a: Option<Checksum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_b: Option<Checksum>,
    /// Paths in A carrying the checksum (checksum-only mode)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths_a: Vec<String>,
    /// Paths in B carrying the checksum (checksum-only mode)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths_b: Vec<String>,
}

impl DiffEntry {
    fn by_path(path: &str, a: Option<&Checksum>, b: Option<&Checksum>) -> Self {
        Self {
            key: path.to_string(),
            checksum_a: a.cloned(),
            checksum_b: b.cloned(),
            paths_a: Vec::new(),
            paths_b: Vec::new(),
        }
    }

    fn by_checksum(checksum: &Checksum, a: Option<&[&str]>, b: Option<&[&str]>) -> Self {
        Self {
            key: checksum.to_string(),
            checksum_a: a.map(|_| checksum.clone()),
            checksum_b: b.map(|_| checksum.clone()),
            paths_a: a.map(owned).unwrap_or_default(),
            paths_b: b.map(owned).unwrap_or_default(),
        }
    }

    /// Paths recorded for `side`; empty unless keyed by checksum
    pub fn paths(&self, side: Side) -> &[String] {
        match side {
            Side::A => &self.paths_a,
            Side::B => &self.paths_b,
        }
    }
}

/// Per-category counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub entries_a: usize,
    pub entries_b: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
}

impl Summary {
    /// Number of keys that did not match
    pub fn differences(&self) -> usize {
        self.mismatched + self.only_in_a + self.only_in_b
    }
}

/// Outcome of comparing manifest A with manifest B
///
/// The four lists are disjoint, sorted by key, and together hold every key
/// of A ∪ B exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub mode: CompareMode,
    pub source_a: String,
    pub source_b: String,
    pub entries_a: usize,
    pub entries_b: usize,
    pub matched: Vec<DiffEntry>,
    pub mismatched: Vec<DiffEntry>,
    pub only_in_a: Vec<DiffEntry>,
    pub only_in_b: Vec<DiffEntry>,
    #[serde(default)]
    pub hints: Vec<AlignmentHint>,
}

impl ComparisonResult {
    pub fn summary(&self) -> Summary {
        Summary {
            entries_a: self.entries_a,
            entries_b: self.entries_b,
            matched: self.matched.len(),
            mismatched: self.mismatched.len(),
            only_in_a: self.only_in_a.len(),
            only_in_b: self.only_in_b.len(),
        }
    }

    /// True when nothing differs
    pub fn is_identical(&self) -> bool {
        self.mismatched.is_empty() && self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }

    /// Entries present only on one side
    pub fn only_in(&self, side: Side) -> &[DiffEntry] {
        match side {
            Side::A => &self.only_in_a,
            Side::B => &self.only_in_b,
        }
    }

    /// Paths of `side` whose contents the other side lacks: one-sided
    /// entries plus both sides' mismatches
    pub fn differing_paths(&self, side: Side) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for entry in self.only_in(side).iter().chain(&self.mismatched) {
            match self.mode {
                CompareMode::ChecksumOnly => {
                    paths.extend(entry.paths(side).iter().map(String::as_str))
                }
                _ => paths.push(&entry.key),
            }
        }
        paths.sort_unstable();
        paths.dedup();
        paths
    }

    /// The same comparison seen from B's side
    pub fn swapped(&self) -> Self {
        let flip = |entries: &[DiffEntry]| -> Vec<DiffEntry> {
            entries
                .iter()
                .map(|e| DiffEntry {
                    key: e.key.clone(),
                    checksum_a: e.checksum_b.clone(),
                    checksum_b: e.checksum_a.clone(),
                    paths_a: e.paths_b.clone(),
                    paths_b: e.paths_a.clone(),
                })
                .collect()
        };

        Self {
            mode: self.mode,
            source_a: self.source_b.clone(),
            source_b: self.source_a.clone(),
            entries_a: self.entries_b,
            entries_b: self.entries_a,
            matched: flip(&self.matched),
            mismatched: flip(&self.mismatched),
            only_in_a: flip(&self.only_in_b),
            only_in_b: flip(&self.only_in_a),
            hints: self.hints.iter().map(AlignmentHint::swapped).collect(),
        }
    }
}

/// Compares two manifests
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn with_mode(mode: CompareMode) -> Self {
        Self::new(CompareOptions { mode, hint_cutoff: None })
    }

    pub fn compare(&self, a: &Manifest, b: &Manifest) -> ComparisonResult {
        let mut result = ComparisonResult {
            mode: self.options.mode,
            source_a: a.display_name(),
            source_b: b.display_name(),
            entries_a: a.len(),
            entries_b: b.len(),
            ..Default::default()
        };

        match self.options.mode {
            CompareMode::Full | CompareMode::PathOnly => self.compare_by_path(a, b, &mut result),
            CompareMode::ChecksumOnly => compare_by_checksum(a, b, &mut result),
        }

        if let Some(cutoff) = self.options.hint_cutoff {
            result.hints = similar::alignment_hints(&result, cutoff);
        }

        tracing::debug!(
            mode = %result.mode,
            matched = result.matched.len(),
            mismatched = result.mismatched.len(),
            only_in_a = result.only_in_a.len(),
            only_in_b = result.only_in_b.len(),
            hints = result.hints.len(),
            "Comparison complete"
        );

        result
    }

    fn compare_by_path(&self, a: &Manifest, b: &Manifest, result: &mut ComparisonResult) {
        let ignore_checksum = self.options.mode == CompareMode::PathOnly;

        for merged in merge_sorted(a.iter(), b.iter()) {
            match merged {
                Merged::Both(path, ca, cb) => {
                    let entry = DiffEntry::by_path(path, Some(ca), Some(cb));
                    if ignore_checksum || ca == cb {
                        result.matched.push(entry);
                    } else {
                        result.mismatched.push(entry);
                    }
                }
                Merged::Left(path, ca) => result.only_in_a.push(DiffEntry::by_path(path, Some(ca), None)),
                Merged::Right(path, cb) => result.only_in_b.push(DiffEntry::by_path(path, None, Some(cb))),
            }
        }
    }
}

fn compare_by_checksum(a: &Manifest, b: &Manifest, result: &mut ComparisonResult) {
    let index_a = a.by_checksum();
    let index_b = b.by_checksum();

    for merged in merge_sorted(index_a.into_iter(), index_b.into_iter()) {
        match merged {
            Merged::Both(checksum, pa, pb) => result
                .matched
                .push(DiffEntry::by_checksum(checksum, Some(pa.as_slice()), Some(pb.as_slice()))),
            Merged::Left(checksum, pa) => result
                .only_in_a
                .push(DiffEntry::by_checksum(checksum, Some(pa.as_slice()), None)),
            Merged::Right(checksum, pb) => result
                .only_in_b
                .push(DiffEntry::by_checksum(checksum, None, Some(pb.as_slice()))),
        }
    }
}

fn owned(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

/// One step of a merge over two key-sorted sequences
#[derive(Debug, PartialEq, Eq)]
enum Merged<K, V> {
    Both(K, V, V),
    Left(K, V),
    Right(K, V),
}

/// Merge two iterators sorted by unique key
fn merge_sorted<K, V, A, B>(a: A, b: B) -> MergeSorted<A, B>
where
    K: Ord,
    A: Iterator<Item = (K, V)>,
    B: Iterator<Item = (K, V)>,
{
    MergeSorted {
        a: a.peekable(),
        b: b.peekable(),
    }
}

struct MergeSorted<A: Iterator, B: Iterator> {
    a: Peekable<A>,
    b: Peekable<B>,
}

impl<K, V, A, B> Iterator for MergeSorted<A, B>
where
    K: Ord,
    A: Iterator<Item = (K, V)>,
    B: Iterator<Item = (K, V)>,
{
    type Item = Merged<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let order = match (self.a.peek(), self.b.peek()) {
            (Some((ka, _)), Some((kb, _))) => ka.cmp(kb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => return None,
        };

        match order {
            Ordering::Less => self.a.next().map(|(k, v)| Merged::Left(k, v)),
            Ordering::Greater => self.b.next().map(|(k, v)| Merged::Right(k, v)),
            Ordering::Equal => {
                let (k, va) = self.a.next()?;
                let (_, vb) = self.b.next()?;
                Some(Merged::Both(k, va, vb))
            }
        }
    }
}

//! Root alignment hints
//!
//! Two manifests of the same tree taken from different mount points
//! (`./raw/a.hex` vs `./SR2324/raw/a.hex`) compare as entirely one-sided.
//! A hint pairs an only-in-A entry with an only-in-B entry that carries the
//! same checksum and whose path differs only in a leading portion no longer
//! than `cutoff` of either path. Hints never move entries between the
//! comparison categories.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use md5verify_core::Checksum;

use crate::diff::{ComparisonResult, DiffEntry};

/// Default fraction of a path that may be cut away to call two paths similar
pub const DEFAULT_CUTOFF: f64 = 0.4;

/// A likely pairing of the same file under different roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentHint {
    pub path_a: String,
    pub path_b: String,
    pub checksum: Checksum,
    /// Leading part of `path_a` not shared with `path_b`
    pub root_a: String,
    /// Leading part of `path_b` not shared with `path_a`
    pub root_b: String,
}

impl AlignmentHint {
    pub fn swapped(&self) -> Self {
        Self {
            path_a: self.path_b.clone(),
            path_b: self.path_a.clone(),
            checksum: self.checksum.clone(),
            root_a: self.root_b.clone(),
            root_b: self.root_a.clone(),
        }
    }
}

/// Number of trailing characters two strings share
pub fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Whether two paths match once at most `cutoff` of each is chopped off the front
pub fn paths_similar(a: &str, b: &str, cutoff: f64) -> bool {
    let common = common_suffix_len(a, b);
    if common == 0 {
        return false;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let cut_a = (len_a - common) as f64 / len_a as f64;
    let cut_b = (len_b - common) as f64 / len_b as f64;

    cut_a <= cutoff && cut_b <= cutoff
}

/// Strip the last `suffix_chars` characters of `path`
fn leading_part(path: &str, suffix_chars: usize) -> String {
    let keep = path.chars().count() - suffix_chars;
    path.chars().take(keep).collect()
}

/// Pair one-sided entries that look like the same file under another root
///
/// Each only-in-B entry is used at most once; among candidates with the same
/// checksum the one sharing the longest path suffix wins.
pub fn alignment_hints(result: &ComparisonResult, cutoff: f64) -> Vec<AlignmentHint> {
    let mut by_checksum: HashMap<&Checksum, Vec<&DiffEntry>> = HashMap::new();
    for entry in &result.only_in_b {
        if let Some(checksum) = &entry.checksum_b {
            by_checksum.entry(checksum).or_default().push(entry);
        }
    }

    let mut hints = Vec::new();
    for entry_a in &result.only_in_a {
        let Some(checksum) = &entry_a.checksum_a else {
            continue;
        };
        let Some(candidates) = by_checksum.get_mut(checksum) else {
            continue;
        };

        let best = candidates
            .iter()
            .enumerate()
            .filter(|(_, b)| paths_similar(&entry_a.key, &b.key, cutoff))
            .max_by_key(|(_, b)| common_suffix_len(&entry_a.key, &b.key))
            .map(|(idx, _)| idx);

        if let Some(idx) = best {
            let entry_b = candidates.swap_remove(idx);
            let common = common_suffix_len(&entry_a.key, &entry_b.key);
            hints.push(AlignmentHint {
                path_a: entry_a.key.clone(),
                path_b: entry_b.key.clone(),
                checksum: checksum.clone(),
                root_a: leading_part(&entry_a.key, common),
                root_b: leading_part(&entry_b.key, common),
            });
        }
    }

    tracing::debug!(hints = hints.len(), cutoff, "Computed root alignment hints");
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_sided(path: &str, checksum: &str, side_a: bool) -> DiffEntry {
        let checksum = Some(Checksum::new(checksum));
        DiffEntry {
            key: path.to_string(),
            checksum_a: if side_a { checksum.clone() } else { None },
            checksum_b: if side_a { None } else { checksum },
            paths_a: Vec::new(),
            paths_b: Vec::new(),
        }
    }

    #[test]
    fn test_common_suffix_len() {
        assert_eq!(common_suffix_len("./a/b.txt", "./x/a/b.txt"), 8);
        assert_eq!(common_suffix_len("abc", "xyz"), 0);
        assert_eq!(common_suffix_len("", "abc"), 0);
    }

    #[test]
    fn test_paths_similar() {
        assert!(paths_similar("./SR2324/raw/ctd_001.hex", "./raw/ctd_001.hex", DEFAULT_CUTOFF));
        assert!(paths_similar("./a.txt", "./a.txt", 0.0));
        assert!(!paths_similar("./a.txt", "./b.dat", DEFAULT_CUTOFF));
        assert!(!paths_similar("./very/long/prefix/dir/a.txt", "./a.txt", DEFAULT_CUTOFF));
    }

    #[test]
    fn test_hints_pair_relocated_root() {
        let result = ComparisonResult {
            only_in_a: vec![
                one_sided("./SR2324/raw/ctd_001.hex", "aa", true),
                one_sided("./SR2324/raw/ctd_002.hex", "bb", true),
            ],
            only_in_b: vec![
                one_sided("./raw/ctd_001.hex", "aa", false),
                one_sided("./raw/ctd_002.hex", "cc", false),
            ],
            ..Default::default()
        };

        let hints = alignment_hints(&result, DEFAULT_CUTOFF);

        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].path_a, "./SR2324/raw/ctd_001.hex");
        assert_eq!(hints[0].path_b, "./raw/ctd_001.hex");
        assert_eq!(hints[0].root_a, "./SR2324");
        assert_eq!(hints[0].root_b, ".");
    }

    #[test]
    fn test_hints_use_each_b_once() {
        let result = ComparisonResult {
            only_in_a: vec![
                one_sided("./old/x/same.bin", "aa", true),
                one_sided("./old/y/same.bin", "aa", true),
            ],
            only_in_b: vec![one_sided("./new/x/same.bin", "aa", false)],
            ..Default::default()
        };

        let hints = alignment_hints(&result, DEFAULT_CUTOFF);

        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].path_a, "./old/x/same.bin");
    }

    #[test]
    fn test_hint_swapped() {
        let hint = AlignmentHint {
            path_a: "./A/f".into(),
            path_b: "./f".into(),
            checksum: Checksum::new("aa"),
            root_a: "./A".into(),
            root_b: ".".into(),
        };
        let swapped = hint.swapped();
        assert_eq!(swapped.path_a, "./f");
        assert_eq!(swapped.root_b, "./A");
    }
}

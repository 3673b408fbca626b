// md5verify-parsers/src/manifest/map.rs
//! In-memory manifest: path to checksum

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use md5verify_core::{Checksum, ManifestEntry};

/// Parsed manifest, keyed by normalized path
///
/// When a path occurs more than once the last occurrence wins; every
/// repeat is recorded in [`Manifest::duplicates`].
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// File the manifest was read from, if any
    pub source: Option<PathBuf>,
    /// Path to checksum, sorted by path
    pub entries: BTreeMap<String, Checksum>,
    /// Number of data lines accepted (duplicates included)
    pub lines_read: usize,
    /// Number of malformed lines skipped in lenient mode
    pub skipped: usize,
    /// Paths that appeared more than once, in order of reappearance
    pub duplicates: Vec<String>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manifest from entries, applying the last-wins rule
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ManifestEntry>,
    {
        let mut manifest = Self::new();
        for entry in entries {
            manifest.insert(entry);
        }
        manifest
    }

    /// Attach the source path
    pub fn with_source(mut self, path: impl AsRef<Path>) -> Self {
        self.source = Some(path.as_ref().to_path_buf());
        self
    }

    /// Insert an entry, returning the checksum it replaced
    pub fn insert(&mut self, entry: ManifestEntry) -> Option<Checksum> {
        self.lines_read += 1;
        let previous = self.entries.insert(entry.path.clone(), entry.checksum);
        if previous.is_some() {
            tracing::warn!(path = %entry.path, line = entry.line, "Duplicate path in manifest, keeping last occurrence");
            self.duplicates.push(entry.path);
        }
        previous
    }

    /// Number of unique paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the checksum recorded for a path
    pub fn get(&self, path: &str) -> Option<&Checksum> {
        self.entries.get(path)
    }

    /// Check if a path is present
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterate `(path, checksum)` in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Checksum)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c))
    }

    /// Iterate paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Invert the mapping: checksum to every path carrying it
    pub fn by_checksum(&self) -> BTreeMap<&Checksum, Vec<&str>> {
        let mut index: BTreeMap<&Checksum, Vec<&str>> = BTreeMap::new();
        for (path, checksum) in self.iter() {
            index.entry(checksum).or_default().push(path);
        }
        index
    }

    /// Name used in reports: the source file, or `<memory>`
    pub fn display_name(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<T: IntoIterator<Item = ManifestEntry>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, hash: &str, line: usize) -> ManifestEntry {
        ManifestEntry::new(path, hash, line)
    }

    #[test]
    fn test_last_occurrence_wins() {
        let manifest = Manifest::from_entries(vec![
            entry("a.txt", "111", 1),
            entry("b.txt", "222", 2),
            entry("a.txt", "333", 3),
        ]);

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.lines_read, 3);
        assert_eq!(manifest.get("a.txt"), Some(&Checksum::new("333")));
        assert_eq!(manifest.duplicates, vec!["a.txt".to_string()]);
    }

    #[test]
    fn test_paths_sorted() {
        let manifest: Manifest = vec![entry("c", "1", 1), entry("a", "2", 2), entry("b", "3", 3)]
            .into_iter()
            .collect();

        let paths: Vec<_> = manifest.paths().collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_by_checksum_groups_paths() {
        let manifest = Manifest::from_entries(vec![
            entry("a", "aa", 1),
            entry("b", "bb", 2),
            entry("copy_of_a", "aa", 3),
        ]);

        let index = manifest.by_checksum();
        assert_eq!(index[&Checksum::new("aa")], vec!["a", "copy_of_a"]);
        assert_eq!(index[&Checksum::new("bb")], vec!["b"]);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Manifest::new().display_name(), "<memory>");
        assert_eq!(Manifest::new().with_source("a.md5").display_name(), "a.md5");
    }
}

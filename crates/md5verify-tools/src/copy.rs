//! Copy the files one side is missing into a sibling `_update` directory
//!
//! A manifest `SR2324.md5deep.txt` describes the data directory `SR2324`;
//! differing files are copied from `SR2324/<path>` to
//! `SR2324_update/<path>`, keeping relative paths.

use std::fs;
use std::path::{Component, Path, PathBuf};

use md5verify_core::{Error, Result, ResultExt};

/// Outcome of a copy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Directory the files were copied into
    pub target: PathBuf,
    /// Number of files copied
    pub copied: usize,
}

/// Data directory described by a manifest: the manifest path with up to two
/// trailing extensions removed
pub fn data_dir_for_manifest(manifest: &Path) -> PathBuf {
    let mut dir = manifest.to_path_buf();
    for _ in 0..2 {
        if dir.extension().is_some() {
            dir.set_extension("");
        }
    }
    dir
}

/// `<dir>_update`, next to `<dir>`
pub fn update_dir_for(data_dir: &Path) -> PathBuf {
    let mut name = data_dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push("_update");
    data_dir.with_file_name(name)
}

/// Manifest path to a path relative to the data directory
fn relative(path: &str) -> &str {
    let path = path.strip_prefix("./").unwrap_or(path);
    path.trim_start_matches('/')
}

/// Relative path that stays inside the directory it is joined onto
fn contained(path: &str) -> Result<&Path> {
    let rel = Path::new(relative(path));
    let mut components = rel.components().peekable();
    if components.peek().is_none() || !components.all(|c| matches!(c, Component::Normal(_))) {
        return Err(Error::UnsafePath(path.to_string()));
    }
    Ok(rel)
}

/// Copy `paths` from the manifest's data directory into its `_update` twin
///
/// Returns `Ok(None)` without touching the filesystem when there is nothing
/// to copy.
pub fn copy_difference(manifest: &Path, paths: &[&str]) -> Result<Option<CopyReport>> {
    if paths.is_empty() {
        tracing::warn!(manifest = %manifest.display(), "No differences to copy, update directory not created");
        return Ok(None);
    }

    let source_root = data_dir_for_manifest(manifest);
    let target_root = update_dir_for(&source_root);

    if !source_root.is_dir() {
        return Err(Error::FileNotFound(source_root)
            .with_context(format!("data directory for {}", manifest.display())));
    }

    let rels = paths
        .iter()
        .map(|path| contained(path))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("copying differences of {}", manifest.display()))?;

    for (path, rel) in paths.iter().zip(rels) {
        let source = source_root.join(rel);
        let target = target_root.join(rel);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::from_io(e, parent))?;
        }

        fs::copy(&source, &target)
            .map_err(|e| Error::from_io(e, &source))
            .with_context(|| format!("copying {}", path))?;

        tracing::debug!(source = %source.display(), target = %target.display(), "Copied file");
    }

    tracing::info!(target = %target_root.display(), copied = paths.len(), "Copy has been created");

    Ok(Some(CopyReport {
        target: target_root,
        copied: paths.len(),
    }))
}

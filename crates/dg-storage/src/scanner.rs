//! Source discovery by filesystem walking.
//!
//! The Scanner only identifies files: markdown sources and everything else
//! (assets). Reading content is left to `FsStorage`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{ScanResult, StorageError, is_markdown_path};

/// Walks a docs root and classifies every visible file.
///
/// Hidden files and directories (leading `.`) are skipped. Symlinks are
/// followed, but their canonical target must stay inside the root. Every
/// alias of a directory is listed; a directory already on the current path
/// is not entered again, so symlink cycles terminate.
pub(crate) struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Scan the filesystem and return sorted source and asset paths.
    ///
    /// Returns an empty result if the source directory doesn't exist.
    pub fn scan(&self) -> Result<ScanResult, StorageError> {
        let mut result = ScanResult::default();
        if !self.source_dir.exists() {
            tracing::warn!(path = %self.source_dir.display(), "Docs directory does not exist");
            return Ok(result);
        }

        let canonical_root = canonicalize(&self.source_dir)?;
        let mut ancestors = HashSet::new();
        self.scan_directory(
            &canonical_root,
            &self.source_dir,
            "",
            &mut ancestors,
            &mut result,
        )?;

        result.documents.sort();
        result.assets.sort();
        Ok(result)
    }

    fn scan_directory(
        &self,
        canonical_root: &Path,
        dir_path: &Path,
        prefix: &str,
        ancestors: &mut HashSet<PathBuf>,
        result: &mut ScanResult,
    ) -> Result<(), StorageError> {
        let canonical_dir = canonicalize(dir_path)?;
        if !canonical_dir.starts_with(canonical_root) {
            return Err(StorageError::invalid_path(dir_path));
        }
        // A directory that is its own ancestor is a symlink cycle.
        if !ancestors.insert(canonical_dir.clone()) {
            return Ok(());
        }

        let mut entries = fs::read_dir(dir_path)
            .map_err(|e| StorageError::io(e, Some(dir_path.to_path_buf())))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::io(e, Some(dir_path.to_path_buf())))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };

            let file_type = entry
                .file_type()
                .map_err(|e| StorageError::io(e, Some(path.clone())))?;
            let is_dir = if file_type.is_symlink() {
                let target = canonicalize(&path)?;
                if !target.starts_with(canonical_root) {
                    return Err(StorageError::invalid_path(&path));
                }
                target.is_dir()
            } else {
                file_type.is_dir()
            };

            if is_dir {
                self.scan_directory(canonical_root, &path, &relative, ancestors, result)?;
            } else if is_markdown_path(&relative) {
                result.documents.push(relative);
            } else {
                result.assets.push(relative);
            }
        }

        ancestors.remove(&canonical_dir);
        Ok(())
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, StorageError> {
    fs::canonicalize(path).map_err(|e| StorageError::io(e, Some(path.to_path_buf())))
}

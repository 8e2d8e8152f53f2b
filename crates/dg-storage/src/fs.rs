//! Filesystem storage implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::scanner::Scanner;
use crate::storage::{ImageDimensions, ScanResult, Storage, StorageError};

const BACKEND: &str = "Fs";

/// Storage backed by a directory tree on disk.
#[derive(Debug, Clone)]
pub struct FsStorage {
    source_dir: PathBuf,
}

impl FsStorage {
    /// Create a storage rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Docs root this storage reads from.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Map a docs-root-relative path to a filesystem path.
    ///
    /// Absolute paths and parent components are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let valid = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !valid {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        Ok(self.source_dir.join(relative))
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<ScanResult, StorageError> {
        Scanner::new(self.source_dir.clone())
            .scan()
            .map_err(|e| e.with_backend(BACKEND))
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    fn image_dimensions(&self, path: &str) -> Option<ImageDimensions> {
        let full_path = self.resolve(path).ok()?;
        match imagesize::size(&full_path) {
            Ok(size) if size.width > 0 && size.height > 0 => Some(ImageDimensions {
                width: u32::try_from(size.width).ok()?,
                height: u32::try_from(size.height).ok()?,
            }),
            Ok(_) => None,
            Err(err) => {
                debug!(path, error = %err, "Failed to read image metadata");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageErrorKind;

    /// Minimal PNG: signature plus an IHDR chunk.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn test_read_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("intro.md"), "# Intro").unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.read("intro.md").unwrap(), "# Intro");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read("missing.md").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_rejects_parent_components() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read("../outside.md").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
        assert!(!storage.exists("../outside.md"));
        assert!(!storage.exists("/etc/passwd"));
    }

    #[test]
    fn test_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("dir")).unwrap();
        fs::write(temp_dir.path().join("dir/page.md"), "").unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.exists("dir/page.md"));
        assert!(!storage.exists("dir"));
        assert!(!storage.exists("dir/other.md"));
    }

    #[test]
    fn test_image_dimensions_png() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("logo.png"), png_bytes(640, 480)).unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(
            storage.image_dimensions("logo.png"),
            Some(ImageDimensions {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn test_image_dimensions_unknown_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "plain text").unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.image_dimensions("notes.txt"), None);
        assert_eq!(storage.image_dimensions("missing.png"), None);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let result = storage.scan().unwrap();

        assert!(result.documents.is_empty());
        assert_eq!(storage.source_dir(), temp_dir.path());
    }
}

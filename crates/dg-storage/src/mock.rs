//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use crate::storage::{ImageDimensions, ScanResult, Storage, StorageError, is_markdown_path};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files in memory. Use the builder methods to configure the mock
/// with test data.
///
/// # Example
///
/// ```ignore
/// use dg_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("intro.md", "# Intro\n\nContent.")
///     .with_image("logo.png", 64, 32);
///
/// let scan = storage.scan().unwrap();
/// let content = storage.read("intro.md").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    assets: RwLock<BTreeSet<String>>,
    dimensions: RwLock<HashMap<String, ImageDimensions>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    ///
    /// Markdown paths become sources; any other path is listed as an asset.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Add an asset without content or known dimensions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_asset(self, path: impl Into<String>) -> Self {
        self.assets.write().unwrap().insert(path.into());
        self
    }

    /// Add an image asset with known dimensions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_image(self, path: impl Into<String>, width: u32, height: u32) -> Self {
        let path = path.into();
        self.dimensions
            .write()
            .unwrap()
            .insert(path.clone(), ImageDimensions { width, height });
        self.assets.write().unwrap().insert(path);
        self
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<ScanResult, StorageError> {
        let files = self.files.read().unwrap();
        let mut assets = self.assets.read().unwrap().clone();

        let mut documents = Vec::new();
        for path in files.keys() {
            if is_markdown_path(path) {
                documents.push(path.clone());
            } else {
                assets.insert(path.clone());
            }
        }

        Ok(ScanResult {
            documents,
            assets: assets.into_iter().collect(),
        })
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
            || self.assets.read().unwrap().contains(path)
    }

    fn image_dimensions(&self, path: &str) -> Option<ImageDimensions> {
        self.dimensions.read().unwrap().get(path).copied()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::StorageErrorKind;

    #[test]
    fn test_scan_splits_sources_and_assets() {
        let storage = MockStorage::new()
            .with_file("b.md", "# B")
            .with_file("a.md", "# A")
            .with_file("notes.txt", "text")
            .with_image("img/logo.png", 10, 20)
            .with_asset("file.pdf");

        let scan = storage.scan().unwrap();

        assert_eq!(scan.documents, vec!["a.md", "b.md"]);
        assert_eq!(scan.assets, vec!["file.pdf", "img/logo.png", "notes.txt"]);
    }

    #[test]
    fn test_read_and_exists() {
        let storage = MockStorage::new()
            .with_file("a.md", "# A")
            .with_asset("logo.svg");

        assert_eq!(storage.read("a.md").unwrap(), "# A");
        assert!(storage.exists("a.md"));
        assert!(storage.exists("logo.svg"));
        assert!(!storage.exists("b.md"));

        let err = storage.read("b.md").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_image_dimensions() {
        let storage = MockStorage::new()
            .with_image("logo.png", 64, 32)
            .with_asset("plain.bin");

        assert_eq!(
            storage.image_dimensions("logo.png"),
            Some(ImageDimensions {
                width: 64,
                height: 32
            })
        );
        assert_eq!(storage.image_dimensions("plain.bin"), None);
    }
}

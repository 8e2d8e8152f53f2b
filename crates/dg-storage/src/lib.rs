//! Storage abstraction for the docsgraph generator.
//!
//! This crate provides a [`Storage`] trait for discovering markdown sources and
//! assets below a docs root and reading them back. This enables:
//!
//! - **Unit testing** of graph assembly without touching the real filesystem
//! - **Clean separation** between graph logic and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()`, `read()`, `exists()` and `image_dimensions()`
//! - [`FsStorage`] implementation over a directory tree
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use dg_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! let scan = storage.scan()?;
//! for path in &scan.documents {
//!     println!("{path}");
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod scanner;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{
    ImageDimensions, ScanResult, Storage, StorageError, StorageErrorKind, is_markdown_path,
};

//! Error type for graph assembly and lookups.

use dg_markdown::HrefError;
use dg_storage::StorageError;

/// Error building or querying the docs graph.
///
/// Every variant is fatal for a generation run: no artifact is written unless
/// the whole graph builds and validates.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Invalid input: bad frontmatter, unusable slug, broken section registry.
    #[error("{0}")]
    Configuration(String),
    /// A relative path climbs above the docs root.
    #[error(transparent)]
    PathEscape(#[from] HrefError),
    #[error("Duplicate route path '{route_path}' for '{source_path}' and '{existing}'")]
    DuplicateRoute {
        route_path: String,
        source_path: String,
        existing: String,
    },
    #[error("Duplicate source path '{0}'")]
    DuplicateSource(String),
    #[error("Duplicate heading id '{id}' detected in '{source_path}'")]
    DuplicateHeadingId { id: String, source_path: String },
    /// All broken references found in one pass, one message each.
    #[error("{}", .0.join("\n"))]
    ReferenceValidation(Vec<String>),
    /// A link resolved at render time points at no known document.
    #[error("Unresolved markdown link '{href}' in '{source_path}' (resolved '{resolved}')")]
    UnresolvedLink {
        href: String,
        source_path: String,
        resolved: String,
    },
    /// An image resolved at render time points at no known asset.
    #[error("Unresolved image link '{href}' in '{source_path}' (resolved '{resolved}')")]
    UnresolvedImage {
        href: String,
        source_path: String,
        resolved: String,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GraphError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

//! Application state.
//!
//! A read-only snapshot of the generated artifacts shared by all handlers.

use std::path::{Path, PathBuf};

use dg_graph::{DocsRepository, Navigation, RuntimeDocsGraph};
use serde::de::DeserializeOwned;

use crate::error::ServerError;
use crate::{RUNTIME_GRAPH_FILENAME, SEARCH_INDEX_FILENAME, SITE_PUBLIC_FILENAME};

/// Application state shared across all handlers.
#[derive(Debug)]
pub(crate) struct AppState {
    pub(crate) repository: DocsRepository,
    pub(crate) navigation: Navigation,
    /// Serialized search index, served as-is.
    pub(crate) search_index: Option<String>,
    pub(crate) site_public: Option<serde_json::Value>,
}

impl AppState {
    pub(crate) fn new(
        graph: RuntimeDocsGraph,
        search_index: Option<String>,
        site_public: Option<serde_json::Value>,
    ) -> Result<Self, ServerError> {
        let repository = DocsRepository::new(graph)?;
        let navigation = Navigation::build(&repository)?;
        Ok(Self {
            repository,
            navigation,
            search_index,
            site_public,
        })
    }

    /// Load the artifacts written by `dg generate` from `output_dir`.
    ///
    /// The runtime graph is required. The search index and the public site
    /// config are optional.
    pub(crate) fn load(output_dir: &Path) -> Result<Self, ServerError> {
        let graph_path = output_dir.join(RUNTIME_GRAPH_FILENAME);
        let graph: RuntimeDocsGraph = read_json(&graph_path)?
            .ok_or_else(|| ServerError::ArtifactNotFound(graph_path.clone()))?;

        let search_index = read_optional(&output_dir.join(SEARCH_INDEX_FILENAME))?;
        if search_index.is_none() {
            tracing::warn!(output_dir = %output_dir.display(), "Search index not generated");
        }
        let site_public = read_json(&output_dir.join(SITE_PUBLIC_FILENAME))?;

        let state = Self::new(graph, search_index, site_public)?;
        tracing::info!(
            document_count = state.repository.graph().docs.len(),
            section_count = state.navigation.sections().len(),
            "Loaded docs graph"
        );
        Ok(state)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ServerError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ServerError> {
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| ServerError::InvalidArtifact {
            path: PathBuf::from(path),
            source,
        })
}

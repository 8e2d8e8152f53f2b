//! Error types for the HTTP server.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dg_graph::GraphError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No page is registered for the route.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// `search-index.json` has not been generated.
    #[error("Search index is not available yet.")]
    SearchIndexUnavailable,

    /// Required artifact is missing from the output directory.
    #[error("Artifact not found: {}. Run `dg generate` first.", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Artifact exists but is not valid JSON for its shape.
    #[error("Invalid artifact {}: {source}", path.display())]
    InvalidArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Loaded graph is inconsistent.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(route) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "route": route}),
            ),
            Self::SearchIndexUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({"error": self.to_string()}),
            ),
            Self::ArtifactNotFound(_)
            | Self::InvalidArtifact { .. }
            | Self::Graph(_)
            | Self::Io(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

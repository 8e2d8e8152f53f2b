//! Search index endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /search-index.json.
///
/// Serves the generated index verbatim.
pub(crate) async fn get_search_index(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let index = state
        .search_index
        .clone()
        .ok_or(ServerError::SearchIndexUnavailable)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], index).into_response())
}

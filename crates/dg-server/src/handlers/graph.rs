//! Runtime graph API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Handle GET /api/graph.
pub(crate) async fn get_graph(State(state): State<Arc<AppState>>) -> Response {
    Json(state.repository.graph()).into_response()
}

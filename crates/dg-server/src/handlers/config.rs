//! Public site configuration endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Handle GET /api/config.
///
/// Returns the generated `site-public.json`, or 404 when it was not written.
pub(crate) async fn get_config(State(state): State<Arc<AppState>>) -> Response {
    match &state.site_public {
        Some(config) => Json(config).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

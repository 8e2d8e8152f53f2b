//! Pages API endpoint.
//!
//! Returns the view data of one route: entry, section, headings, edit URL
//! and pagination.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/pages/{*route}.
pub(crate) async fn get_page(
    Path(route): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let route_path = format!("/{}", route.trim_matches('/'));
    let data = state
        .navigation
        .route_data(&state.repository, &route_path)?
        .ok_or_else(|| ServerError::PageNotFound(route_path.clone()))?;

    Ok((
        [(header::CACHE_CONTROL, "private, max-age=60")],
        Json(data),
    )
        .into_response())
}

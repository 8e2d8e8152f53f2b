//! Navigation API endpoint.
//!
//! Returns the sidebar sections without source paths.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use dg_graph::ClientDocsSection;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    sections: Vec<ClientDocsSection>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<NavigationResponse> {
    Json(NavigationResponse {
        sections: state.navigation.client_sections(),
    })
}

//! HTTP server for docsgraph.
//!
//! Serves the artifacts written by `dg generate` with axum:
//! - `GET /api/graph`: runtime docs graph
//! - `GET /api/navigation`: sidebar sections
//! - `GET /api/pages/{*route}`: view data for one route
//! - `GET /api/config`: public site configuration
//! - `GET /search-index.json`: serialized search index
//!
//! Artifacts are loaded once at startup into a read-only snapshot; rerun
//! `dg generate` and restart to pick up changes.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use dg_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 7979,
//!         output_dir: PathBuf::from("build"),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub use error::ServerError;
use state::AppState;

/// Full docs graph including search text.
pub const DOCS_GRAPH_FILENAME: &str = "docs-graph.json";
/// Docs graph without search text, read by the server.
pub const RUNTIME_GRAPH_FILENAME: &str = "docs-runtime-graph.json";
pub const SEARCH_INDEX_FILENAME: &str = "search-index.json";
pub const SITE_PUBLIC_FILENAME: &str = "site-public.json";
pub const LLMS_FILENAME: &str = "llms.txt";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the generated artifacts.
    pub output_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            output_dir: PathBuf::from("build"),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the artifacts cannot be loaded or the server fails to
/// start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::load(&config.output_dir)?);
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

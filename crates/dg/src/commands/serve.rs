//! `dg serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use dg_config::{CliSettings, Config};
use dg_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover docsgraph.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding generated artifacts (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Artifacts: {}",
            config.docs_resolved.output_dir.display()
        ));

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            output_dir: config.docs_resolved.output_dir.clone(),
        };
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

//! `dg llms` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use dg_config::{CliSettings, Config};
use dg_graph::build_llms_document;
use dg_server::LLMS_FILENAME;

use super::{build_graph, source_storage};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the llms command.
#[derive(Args)]
pub(crate) struct LlmsArgs {
    /// Path to configuration file (default: auto-discover docsgraph.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// File to write (default: llms.txt in the output directory).
    #[arg(long)]
    output: Option<PathBuf>,
}

impl LlmsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let target = self
            .output
            .unwrap_or_else(|| config.docs_resolved.output_dir.join(LLMS_FILENAME));

        write_llms(&config, &target)?;

        output.success(&format!("Wrote {}", target.display()));
        Ok(())
    }
}

/// Build the graph and write the plain-text dump to `target`.
pub(crate) fn write_llms(config: &Config, target: &Path) -> Result<(), CliError> {
    let storage = source_storage(config);
    let graph = build_graph(config, Arc::clone(&storage))?;
    let document = build_llms_document(
        &graph,
        &config.site.title(),
        &config.site.description,
        storage.as_ref(),
    )?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{load, project};

    #[test]
    fn test_write_llms() {
        let dir = project();
        let config = load(dir.path());
        let target = dir.path().join("build/llms.txt");

        write_llms(&config, &target).unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert!(content.starts_with("# Acme Handbook\n"));
        assert!(content.contains("Everything about Acme."));
        assert!(content.contains("### Intro\n"));
        assert!(content.contains("Source: /setup"));
        assert!(!content.contains("Usage"));
        assert!(!content.contains("llms: false"));
    }
}

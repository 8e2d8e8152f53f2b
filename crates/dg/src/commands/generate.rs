//! `dg generate` command implementation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use dg_config::{CliSettings, Config};
use dg_search::SearchIndex;
use dg_server::{
    DOCS_GRAPH_FILENAME, RUNTIME_GRAPH_FILENAME, SEARCH_INDEX_FILENAME, SITE_PUBLIC_FILENAME,
};

use super::{build_graph, search_options, source_storage};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Path to configuration file (default: auto-discover docsgraph.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for generated artifacts (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Public site URL (overrides config).
    #[arg(long, env = "SITE_URL")]
    site_url: Option<String>,
}

impl GenerateArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let start = Instant::now();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            site_url: self.site_url,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let output_dir = &config.docs_resolved.output_dir;

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", output_dir.display()));

        let summary = generate(&config, output_dir)?;
        if summary.documents == 0 {
            output.warning("No markdown files found");
        }

        output.success(&format!(
            "Generated {} pages in {} sections ({} search records) in {}ms",
            summary.documents,
            summary.sections,
            summary.search_records,
            start.elapsed().as_millis()
        ));
        Ok(())
    }
}

/// Counts reported after a run.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) documents: usize,
    pub(crate) sections: usize,
    pub(crate) search_records: usize,
}

/// Build every artifact in memory, then write them to `output_dir`.
///
/// Nothing is written if the graph fails to build or validate.
pub(crate) fn generate(config: &Config, output_dir: &Path) -> Result<Summary, CliError> {
    let graph = build_graph(config, source_storage(config))?;
    let search_index = SearchIndex::from_graph(&graph, search_options(config));

    let artifacts = [
        (DOCS_GRAPH_FILENAME, serde_json::to_string_pretty(&graph)?),
        (
            RUNTIME_GRAPH_FILENAME,
            serde_json::to_string_pretty(&graph.to_runtime())?,
        ),
        (SEARCH_INDEX_FILENAME, search_index.to_json()?),
        (
            SITE_PUBLIC_FILENAME,
            serde_json::to_string_pretty(&config.site_public())?,
        ),
    ];

    std::fs::create_dir_all(output_dir)?;
    for (name, content) in &artifacts {
        std::fs::write(output_dir.join(name), content)?;
    }
    tracing::info!(output_dir = %output_dir.display(), "Artifacts written");

    Ok(Summary {
        documents: graph.docs.len(),
        sections: graph.sections.len(),
        search_records: search_index.document_count,
    })
}

#[cfg(test)]
mod tests {
    use dg_graph::{DocsGraph, RuntimeDocsGraph};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::tests::{load, project};

    #[test]
    fn test_generate_writes_artifacts() {
        let dir = project();
        let config = load(dir.path());
        let output_dir = dir.path().join("build");

        let summary = generate(&config, &output_dir).unwrap();

        assert_eq!(
            summary,
            Summary {
                documents: 3,
                sections: 2,
                search_records: 3,
            }
        );

        let graph: DocsGraph = serde_json::from_str(
            &std::fs::read_to_string(output_dir.join(DOCS_GRAPH_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(graph.docs.len(), 3);

        let runtime: RuntimeDocsGraph = serde_json::from_str(
            &std::fs::read_to_string(output_dir.join(RUNTIME_GRAPH_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(runtime, graph.to_runtime());

        let index = SearchIndex::from_json(
            &std::fs::read_to_string(output_dir.join(SEARCH_INDEX_FILENAME)).unwrap(),
        )
        .unwrap();
        assert!(!index.search("verbose").is_empty());

        let site: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(output_dir.join(SITE_PUBLIC_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(site["siteUrl"], "https://docs.acme.dev");
        assert_eq!(site["site"]["title"], "Acme Handbook");
    }

    #[test]
    fn test_generate_writes_nothing_on_broken_link() {
        let dir = project();
        std::fs::write(
            dir.path().join("docs/setup.md"),
            "# Setup\n\nSee [missing](missing.md).\n",
        )
        .unwrap();
        let config = load(dir.path());
        let output_dir = dir.path().join("build");

        let err = generate(&config, &output_dir).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unresolved markdown link in 'setup.md': 'missing.md' resolves to 'missing.md'"
        );
        assert!(!output_dir.exists());
    }
}

//! `dg search` command implementation.
//!
//! Queries a generated `search-index.json` from the terminal.

use std::path::PathBuf;

use clap::Args;
use dg_config::{CliSettings, Config};
use dg_search::{SearchIndex, highlight_match, snippet};
use dg_server::SEARCH_INDEX_FILENAME;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Search query.
    query: String,

    /// Path to configuration file (default: auto-discover docsgraph.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding generated artifacts (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of results.
    #[arg(short, long, default_value_t = 10)]
    limit: usize,

    /// Print snippets as HTML with query terms wrapped in `<mark>`.
    #[arg(long)]
    html: bool,
}

impl SearchArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let path = config.docs_resolved.output_dir.join(SEARCH_INDEX_FILENAME);
        let index = SearchIndex::from_json(&std::fs::read_to_string(&path)?)?;

        let hits = index.search(&self.query);
        if hits.is_empty() {
            output.warning(&format!("No results for '{}'", self.query));
            return Ok(());
        }

        for hit in hits.iter().take(self.limit) {
            let record = hit.record;
            let url = if record.anchor.is_empty() {
                record.url.clone()
            } else {
                format!("{}#{}", record.url, record.anchor)
            };
            output.highlight(&format!("{} ({})", record.title, record.section));
            output.detail(&url);
            output.info(&render_snippet(&record.text, &self.query, self.html));
        }
        Ok(())
    }
}

/// Snippet around the first match, optionally as highlighted HTML.
fn render_snippet(text: &str, query: &str, html: bool) -> String {
    let snippet = snippet(text, query, 0);
    if html {
        highlight_match(&snippet, query)
    } else {
        snippet
    }
}

//! CLI command implementations.

pub(crate) mod generate;
pub(crate) mod llms;
pub(crate) mod search;
pub(crate) mod serve;

use std::sync::Arc;

use dg_config::Config;
use dg_graph::{DocsGraph, GraphBuilder, RepoRef, SectionDef, SectionRegistry};
use dg_search::{CombineWith, SearchOptions};
use dg_storage::{FsStorage, Storage};

use crate::error::CliError;

pub(crate) use generate::GenerateArgs;
pub(crate) use llms::LlmsArgs;
pub(crate) use search::SearchArgs;
pub(crate) use serve::ServeArgs;

/// Section registry from the `[[sections]]` tables.
pub(crate) fn section_registry(config: &Config) -> Result<SectionRegistry, CliError> {
    let sections = config
        .sections
        .iter()
        .map(|s| SectionDef {
            id: s.id.clone(),
            label: s.label.clone(),
            order: s.order,
            icon: s.icon.clone(),
            repo: RepoRef {
                name: s.repo.name.clone(),
                branch: s.repo.branch.clone(),
                docs_path: s.repo.docs_path.clone(),
            },
        })
        .collect();
    Ok(SectionRegistry::new(
        sections,
        config.docs_resolved.edit_base_url.clone(),
    )?)
}

pub(crate) fn search_options(config: &Config) -> SearchOptions {
    SearchOptions {
        fuzzy: config.search.fuzzy,
        prefix: config.search.prefix,
        combine_with: if config.search.combine_with == "OR" {
            CombineWith::Or
        } else {
            CombineWith::And
        },
        max_index_text_length: config.search.max_index_text_length,
        ..SearchOptions::default()
    }
}

/// Storage over the configured source directory.
pub(crate) fn source_storage(config: &Config) -> Arc<dyn Storage> {
    Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()))
}

/// Build and validate the docs graph for the configured sources.
pub(crate) fn build_graph(
    config: &Config,
    storage: Arc<dyn Storage>,
) -> Result<DocsGraph, CliError> {
    let registry = section_registry(config)?;
    Ok(GraphBuilder::new(storage, registry).build()?)
}

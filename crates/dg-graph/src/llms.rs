//! Plain-text export of the whole site for language models (`llms.txt`).

use std::collections::HashMap;

use dg_storage::Storage;

use crate::error::GraphError;
use crate::frontmatter::split_frontmatter;
use crate::model::{DocNode, DocsGraph};

/// Render the `llms.txt` document.
///
/// Pages appear in navigation order under their section heading. Pages with
/// `llms: false` or an empty body are skipped, and so are sections left
/// without pages.
///
/// # Errors
///
/// Fails if a section lists an unknown route or a source cannot be read.
pub fn build_llms_document(
    graph: &DocsGraph,
    title: &str,
    description: &str,
    storage: &dyn Storage,
) -> Result<String, GraphError> {
    let by_route: HashMap<&str, &DocNode> = graph
        .docs
        .iter()
        .map(|doc| (doc.route_path.as_str(), doc))
        .collect();

    let mut parts: Vec<String> = vec![
        format!("# {title}"),
        String::new(),
        description.to_owned(),
        String::new(),
    ];

    for section in &graph.sections {
        let mut section_parts = Vec::new();

        for route_path in &section.pages {
            let doc = by_route.get(route_path.as_str()).ok_or_else(|| {
                GraphError::config(format!(
                    "Missing docs graph node for route '{route_path}'"
                ))
            })?;
            if !doc.llms {
                continue;
            }

            let raw = storage.read(&doc.source_path)?;
            let (_, body) = split_frontmatter(&raw);
            let content = body.trim();
            if content.is_empty() {
                continue;
            }

            section_parts.push(format!("### {}", doc.title));
            section_parts.push(format!("Source: {}", doc.route_path));
            section_parts.push(String::new());
            section_parts.push(content.to_owned());
            section_parts.push(String::new());
        }

        if section_parts.is_empty() {
            continue;
        }
        parts.push("---".to_owned());
        parts.push(format!("## {}", section.title));
        parts.push(String::new());
        parts.append(&mut section_parts);
    }

    let mut document = parts.join("\n").trim_end().to_owned();
    document.push('\n');
    Ok(document)
}

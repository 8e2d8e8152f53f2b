//! Flattening the graph into search records.

use std::collections::HashMap;

use dg_graph::DocsGraph;
use serde::{Deserialize, Serialize};

/// One searchable unit: a page section, or a whole page without headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: u32,
    pub title: String,
    /// Breadcrumb shown under the title.
    pub section: String,
    pub section_id: String,
    pub section_icon: String,
    /// Route path of the page.
    pub url: String,
    /// Heading id, empty for whole-page records.
    pub anchor: String,
    pub text: String,
}

/// Build records for every page, ids starting at 1.
///
/// Pages with search sections produce one record per section. Pages without
/// sections produce a single record from their plain text, or nothing when
/// that is empty too. Text is cut to `max_text_length` characters.
#[must_use]
pub fn build_records(graph: &DocsGraph, max_text_length: usize) -> Vec<SearchRecord> {
    let icons: HashMap<&str, &str> = graph
        .sections
        .iter()
        .map(|s| (s.id.as_str(), s.icon.as_str()))
        .collect();

    let mut records = Vec::new();
    let mut next_id = 1;
    let mut push = |record: SearchRecord| {
        records.push(SearchRecord {
            id: next_id,
            ..record
        });
        next_id += 1;
    };

    for doc in &graph.docs {
        let section_icon = icons
            .get(doc.section_id.as_str())
            .copied()
            .unwrap_or_default()
            .to_owned();

        if doc.search_sections.is_empty() {
            if doc.plain_text.is_empty() {
                continue;
            }
            push(SearchRecord {
                id: 0,
                title: doc.title.clone(),
                section: doc.section_title.clone(),
                section_id: doc.section_id.clone(),
                section_icon,
                url: doc.route_path.clone(),
                anchor: String::new(),
                text: truncate_chars(&doc.plain_text, max_text_length),
            });
            continue;
        }

        for section in &doc.search_sections {
            let title = if section.heading.is_empty() {
                doc.title.clone()
            } else {
                section.heading.clone()
            };
            push(SearchRecord {
                id: 0,
                title,
                section: format!("{} › {}", doc.section_title, doc.title),
                section_id: doc.section_id.clone(),
                section_icon: section_icon.clone(),
                url: doc.route_path.clone(),
                anchor: section.anchor.clone(),
                text: truncate_chars(&section.text, max_text_length),
            });
        }
    }

    records
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}

//! Serialized graph types.
//!
//! [`DocsGraph`] is the full build artifact; [`RuntimeDocsGraph`] is the
//! projection served to the site at runtime (no search text, no build-only
//! fields). Both serialize with camelCase keys.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dg_markdown::{SearchSection, TocHeading};
use dg_storage::ImageDimensions;
use serde::{Deserialize, Serialize};

/// One markdown page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocNode {
    pub source_path: String,
    pub section_id: String,
    pub section_title: String,
    pub content_slug: String,
    pub slug: String,
    pub route_path: String,
    pub category: String,
    pub title: String,
    pub sidebar_label: String,
    pub sidebar_order: Option<f64>,
    pub description: Option<String>,
    pub headings: Vec<TocHeading>,
    pub search_sections: Vec<SearchSection>,
    pub plain_text: String,
    pub edit_url: String,
    pub llms: bool,
}

/// A section with its ordered pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionNode {
    pub id: String,
    pub title: String,
    pub order: i64,
    /// URL prefix below the site root; empty for the root section.
    pub base_path: String,
    pub is_page_anchor: bool,
    pub icon: String,
    /// Route paths in sidebar order.
    pub pages: Vec<String>,
}

/// Complete output of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsGraph {
    pub generated_at: DateTime<Utc>,
    pub docs: Vec<DocNode>,
    pub sections: Vec<SectionNode>,
    /// Every non-markdown file, sorted.
    pub assets: Vec<String>,
    /// Dimensions of assets that could be probed.
    pub asset_metadata: BTreeMap<String, ImageDimensions>,
}

/// Page fields needed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeDocNode {
    pub source_path: String,
    pub section_id: String,
    pub section_title: String,
    pub content_slug: String,
    pub slug: String,
    pub route_path: String,
    pub category: String,
    pub title: String,
    pub sidebar_label: String,
    pub headings: Vec<TocHeading>,
    pub edit_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeDocsGraph {
    pub generated_at: DateTime<Utc>,
    pub docs: Vec<RuntimeDocNode>,
    pub sections: Vec<SectionNode>,
}

impl From<&DocNode> for RuntimeDocNode {
    fn from(doc: &DocNode) -> Self {
        Self {
            source_path: doc.source_path.clone(),
            section_id: doc.section_id.clone(),
            section_title: doc.section_title.clone(),
            content_slug: doc.content_slug.clone(),
            slug: doc.slug.clone(),
            route_path: doc.route_path.clone(),
            category: doc.category.clone(),
            title: doc.title.clone(),
            sidebar_label: doc.sidebar_label.clone(),
            headings: doc.headings.clone(),
            edit_url: doc.edit_url.clone(),
        }
    }
}

impl DocsGraph {
    /// Project the graph down to its runtime form.
    #[must_use]
    pub fn to_runtime(&self) -> RuntimeDocsGraph {
        RuntimeDocsGraph {
            generated_at: self.generated_at,
            docs: self.docs.iter().map(RuntimeDocNode::from).collect(),
            sections: self.sections.clone(),
        }
    }
}

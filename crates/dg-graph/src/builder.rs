//! Docs graph assembly.
//!
//! [`GraphBuilder`] discovers sources through a [`Storage`] backend, parses
//! every document in parallel, enforces unique sources and routes, validates
//! all cross-references and finally groups pages into ordered sections.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use dg_graph::{GraphBuilder, SectionRegistry};
//! use dg_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let graph = GraphBuilder::new(storage, sections).build()?;
//! println!("{} pages", graph.docs.len());
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use dg_markdown::{ExtractError, extract};
use dg_storage::{ImageDimensions, Storage};
use rayon::prelude::*;

use crate::error::GraphError;
use crate::frontmatter::parse_frontmatter;
use crate::location::{derive_doc_location, strip_markdown_extension, title_case};
use crate::model::{DocNode, DocsGraph, SectionNode};
use crate::sections::{ROOT_SECTION_ID, SectionRegistry};
use crate::validate::{DocReferences, validate_references};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// A document after parsing, before validation.
struct ParsedDocument {
    doc: DocNode,
    references: DocReferences,
}

/// Builds a [`DocsGraph`] from a storage backend.
pub struct GraphBuilder {
    storage: Arc<dyn Storage>,
    sections: SectionRegistry,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, sections: SectionRegistry) -> Self {
        Self { storage, sections }
    }

    /// Build and validate the complete graph.
    ///
    /// # Errors
    ///
    /// Fails on the first storage, frontmatter, routing or heading error (in
    /// discovery order), on duplicate sources or routes, and with every broken
    /// reference at once if validation fails.
    pub fn build(&self) -> Result<DocsGraph, GraphError> {
        let start = Instant::now();
        let scan = self.storage.scan()?;

        let results: Vec<Result<ParsedDocument, GraphError>> = scan
            .documents
            .par_iter()
            .map(|path| self.parse_document(path))
            .collect();
        let parse_ms = elapsed_ms(start);

        // Fold in discovery order so a collision is reported before any
        // later document's parse error.
        let mut uniqueness = Uniqueness::default();
        let mut docs = Vec::with_capacity(results.len());
        let mut references = Vec::with_capacity(results.len());
        for result in results {
            let parsed = result?;
            uniqueness.check(&parsed.doc)?;
            docs.push(parsed.doc);
            references.push(parsed.references);
        }

        let asset_metadata: BTreeMap<String, ImageDimensions> = scan
            .assets
            .par_iter()
            .filter_map(|asset| {
                self.storage
                    .image_dimensions(asset)
                    .map(|dims| (asset.clone(), dims))
            })
            .collect();

        let asset_set: HashSet<String> = scan.assets.iter().cloned().collect();
        validate_references(&references, &asset_set)?;

        let sections = self.organize_sections(&docs);
        let docs = order_docs(docs, &sections);

        tracing::info!(
            document_count = docs.len(),
            section_count = sections.len(),
            asset_count = scan.assets.len(),
            probed_asset_count = asset_metadata.len(),
            parse_ms,
            elapsed_ms = elapsed_ms(start),
            "Docs graph built"
        );

        Ok(DocsGraph {
            generated_at: Utc::now(),
            docs,
            sections,
            assets: scan.assets,
            asset_metadata,
        })
    }

    fn parse_document(&self, source_path: &str) -> Result<ParsedDocument, GraphError> {
        let source_path = normalize_source_path(source_path);
        let raw = self.storage.read(&source_path)?;
        let (frontmatter, body) = parse_frontmatter(&raw, &source_path)?;
        let location =
            derive_doc_location(&source_path, frontmatter.slug.as_deref(), &self.sections)?;

        let extraction = extract(body).map_err(|err| match err {
            ExtractError::DuplicateHeadingId { id } => GraphError::DuplicateHeadingId {
                id,
                source_path: source_path.clone(),
            },
        })?;

        let section = self.sections.require(&location.section_id)?;
        let edit_url = self.sections.edit_url(&location.section_id, &source_path)?;

        let title = frontmatter
            .title
            .or(extraction.primary_title)
            .unwrap_or_else(|| title_case(file_stem(&source_path)));
        let sidebar_label = frontmatter
            .sidebar_label
            .unwrap_or_else(|| title.clone());

        let references = DocReferences {
            source_path: source_path.clone(),
            links: extraction.links,
            images: extraction.images,
            heading_anchors: extraction.heading_anchors.into_iter().collect(),
        };

        let doc = DocNode {
            source_path,
            section_id: location.section_id,
            section_title: section.label.clone(),
            content_slug: location.content_slug,
            slug: location.slug,
            route_path: location.route_path,
            category: location.category,
            title,
            sidebar_label,
            sidebar_order: frontmatter.sidebar_order,
            description: frontmatter.description,
            headings: extraction.headings,
            search_sections: extraction.search_sections,
            plain_text: extraction.plain_text,
            edit_url,
            llms: frontmatter.llms,
        };

        Ok(ParsedDocument { doc, references })
    }

    /// Group docs by section. Sections without pages are left out.
    fn organize_sections(&self, docs: &[DocNode]) -> Vec<SectionNode> {
        let mut by_section: HashMap<&str, Vec<&DocNode>> = HashMap::new();
        for doc in docs {
            by_section.entry(&doc.section_id).or_default().push(doc);
        }

        self.sections
            .ordered()
            .into_iter()
            .filter_map(|def| {
                let mut pages = by_section.remove(def.id.as_str())?;
                pages.sort_by(|a, b| compare_pages(a, b));
                let is_root = def.id == ROOT_SECTION_ID;

                Some(SectionNode {
                    id: def.id.clone(),
                    title: def.label.clone(),
                    order: def.order,
                    base_path: if is_root { String::new() } else { def.id.clone() },
                    is_page_anchor: !is_root,
                    icon: def.icon.clone(),
                    pages: pages.iter().map(|d| d.route_path.clone()).collect(),
                })
            })
            .collect()
    }
}

/// Reorder docs to follow the section page lists.
fn order_docs(docs: Vec<DocNode>, sections: &[SectionNode]) -> Vec<DocNode> {
    let mut by_route: HashMap<String, DocNode> = docs
        .into_iter()
        .map(|doc| (doc.route_path.clone(), doc))
        .collect();
    sections
        .iter()
        .flat_map(|section| section.pages.iter())
        .filter_map(|route| by_route.remove(route))
        .collect()
}

/// Sidebar order ascending with unordered pages last, then route path.
fn compare_pages(a: &DocNode, b: &DocNode) -> Ordering {
    let by_order = match (a.sidebar_order, b.sidebar_order) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_order.then_with(|| a.route_path.cmp(&b.route_path))
}

/// Source paths and routes seen so far.
#[derive(Default)]
struct Uniqueness {
    sources: HashSet<String>,
    routes: HashMap<String, String>,
}

impl Uniqueness {
    fn check(&mut self, doc: &DocNode) -> Result<(), GraphError> {
        if !self.sources.insert(doc.source_path.clone()) {
            return Err(GraphError::DuplicateSource(doc.source_path.clone()));
        }
        if let Some(existing) = self
            .routes
            .insert(doc.route_path.clone(), doc.source_path.clone())
        {
            return Err(GraphError::DuplicateRoute {
                route_path: doc.route_path.clone(),
                source_path: doc.source_path.clone(),
                existing,
            });
        }
        Ok(())
    }
}

fn normalize_source_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_start_matches("./").to_owned()
}

fn file_stem(source_path: &str) -> &str {
    let name = source_path.rsplit('/').next().unwrap_or(source_path);
    strip_markdown_extension(name)
}

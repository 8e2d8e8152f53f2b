//! Read-side access to a generated graph.
//!
//! [`DocsRepository`] is built once from a runtime graph, validated on
//! construction, and then shared immutably (typically behind an `Arc`) by
//! everything that serves pages.

use std::collections::{BTreeMap, HashMap, HashSet};

use dg_markdown::href::{
    parse_asset_href, parse_doc_href, resolve_relative_path, with_query_and_hash,
};
use dg_storage::ImageDimensions;

use crate::error::GraphError;
use crate::model::{DocsGraph, RuntimeDocNode, RuntimeDocsGraph};

/// Image source rewritten for the public site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub src: String,
    /// Known dimensions of the referenced asset.
    pub dimensions: Option<ImageDimensions>,
}

/// Validated, indexed view of a runtime graph.
#[derive(Debug)]
pub struct DocsRepository {
    graph: RuntimeDocsGraph,
    by_route: HashMap<String, usize>,
    by_source: HashMap<String, usize>,
    assets: HashSet<String>,
    asset_metadata: BTreeMap<String, ImageDimensions>,
}

impl DocsRepository {
    /// Validate and index a runtime graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Configuration`] if section ids repeat, a route
    /// does not start with `/`, a source is not a markdown path, a doc names
    /// an unknown section, routes repeat, or a section lists a route with no
    /// doc.
    pub fn new(graph: RuntimeDocsGraph) -> Result<Self, GraphError> {
        validate_runtime_graph(&graph)?;

        let by_route = graph
            .docs
            .iter()
            .enumerate()
            .map(|(idx, doc)| (doc.route_path.clone(), idx))
            .collect();
        let by_source = graph
            .docs
            .iter()
            .enumerate()
            .map(|(idx, doc)| (doc.source_path.clone(), idx))
            .collect();

        Ok(Self {
            graph,
            by_route,
            by_source,
            assets: HashSet::new(),
            asset_metadata: BTreeMap::new(),
        })
    }

    /// Attach the asset list used for image resolution.
    #[must_use]
    pub fn with_assets(
        mut self,
        assets: impl IntoIterator<Item = String>,
        asset_metadata: BTreeMap<String, ImageDimensions>,
    ) -> Self {
        self.assets = assets.into_iter().collect();
        self.asset_metadata = asset_metadata;
        self
    }

    /// Build a repository from a full graph, assets included.
    pub fn from_docs_graph(graph: &DocsGraph) -> Result<Self, GraphError> {
        Ok(Self::new(graph.to_runtime())?
            .with_assets(graph.assets.iter().cloned(), graph.asset_metadata.clone()))
    }

    #[must_use]
    pub fn graph(&self) -> &RuntimeDocsGraph {
        &self.graph
    }

    #[must_use]
    pub fn lookup_by_route(&self, route_path: &str) -> Option<&RuntimeDocNode> {
        self.by_route.get(route_path).map(|&idx| &self.graph.docs[idx])
    }

    #[must_use]
    pub fn lookup_by_source(&self, source_path: &str) -> Option<&RuntimeDocNode> {
        self.by_source
            .get(source_path)
            .map(|&idx| &self.graph.docs[idx])
    }

    /// Every route, in graph order.
    #[must_use]
    pub fn all_routes(&self) -> Vec<&str> {
        self.graph
            .docs
            .iter()
            .map(|d| d.route_path.as_str())
            .collect()
    }

    /// Rewrite a markdown link found in `source_path` to its site route.
    ///
    /// Returns `None` for hrefs that are not document links (external URLs,
    /// in-page anchors, other file types).
    ///
    /// # Errors
    ///
    /// Fails if the link escapes the docs root or points at no known doc.
    pub fn resolve_link(&self, source_path: &str, href: &str) -> Result<Option<String>, GraphError> {
        let Some(parsed) = parse_doc_href(href) else {
            return Ok(None);
        };
        let resolved = resolve_relative_path(source_path, &parsed.target_path)?;
        let Some(doc) = self.lookup_by_source(&resolved) else {
            return Err(GraphError::UnresolvedLink {
                href: href.to_owned(),
                source_path: source_path.to_owned(),
                resolved,
            });
        };

        Ok(Some(with_query_and_hash(
            &doc.route_path,
            &parsed.query,
            &parsed.hash,
        )))
    }

    /// Rewrite an image source found in `source_path` to its public URL.
    ///
    /// Known assets are served below `assets_public_path`. Paths under
    /// `assets/` that are not part of the docs tree are site-static files and
    /// served from the site root.
    ///
    /// # Errors
    ///
    /// Fails if the source escapes the docs root or names no asset.
    pub fn resolve_image(
        &self,
        source_path: &str,
        src: &str,
        assets_public_path: &str,
    ) -> Result<Option<ResolvedImage>, GraphError> {
        let Some(parsed) = parse_asset_href(src) else {
            return Ok(None);
        };
        let resolved = resolve_relative_path(source_path, &parsed.target_path)?;

        if self.assets.contains(&resolved) {
            let url = format!("{}/{resolved}", assets_public_path.trim_end_matches('/'));
            return Ok(Some(ResolvedImage {
                src: with_query_and_hash(&url, &parsed.query, &parsed.hash),
                dimensions: self.asset_metadata.get(&resolved).copied(),
            }));
        }
        if resolved.starts_with("assets/") {
            return Ok(Some(ResolvedImage {
                src: with_query_and_hash(&format!("/{resolved}"), &parsed.query, &parsed.hash),
                dimensions: None,
            }));
        }

        Err(GraphError::UnresolvedImage {
            href: src.to_owned(),
            source_path: source_path.to_owned(),
            resolved,
        })
    }
}

fn validate_runtime_graph(graph: &RuntimeDocsGraph) -> Result<(), GraphError> {
    let mut section_ids = HashSet::new();
    for section in &graph.sections {
        if section.id.is_empty() {
            return Err(GraphError::config("Section id must be a non-empty string"));
        }
        if !section_ids.insert(section.id.as_str()) {
            return Err(GraphError::config(format!(
                "Duplicate section id '{}' in docs runtime graph",
                section.id
            )));
        }
    }

    let mut routes = HashSet::new();
    for doc in &graph.docs {
        if !doc.route_path.starts_with('/') {
            return Err(GraphError::config(format!(
                "Invalid routePath for {}",
                doc.source_path
            )));
        }
        if !doc.source_path.ends_with(".md") {
            return Err(GraphError::config(format!(
                "Invalid sourcePath for {}",
                doc.route_path
            )));
        }
        if !section_ids.contains(doc.section_id.as_str()) {
            return Err(GraphError::config(format!(
                "Unknown section id '{}' in docs runtime graph",
                doc.section_id
            )));
        }
        if !routes.insert(doc.route_path.as_str()) {
            return Err(GraphError::config(format!(
                "Duplicate route path '{}' in docs runtime graph",
                doc.route_path
            )));
        }
    }

    for section in &graph.sections {
        for route in &section.pages {
            if !routes.contains(route.as_str()) {
                return Err(GraphError::config(format!(
                    "Section '{}' references unknown route '{route}'",
                    section.id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::SectionNode;
    use crate::model::tests::doc;

    static_assertions::assert_impl_all!(super::DocsRepository: Send, Sync);

    pub(crate) fn section_node(id: &str, base_path: &str, pages: &[&str]) -> SectionNode {
        SectionNode {
            id: id.to_owned(),
            title: format!("{id} title"),
            order: 0,
            base_path: base_path.to_owned(),
            is_page_anchor: !base_path.is_empty(),
            icon: format!("{id}-icon"),
            pages: pages.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    pub(crate) fn runtime_graph() -> RuntimeDocsGraph {
        let docs = vec![
            doc("/intro", "intro.md", "_root"),
            doc("/guides/setup", "guides/setup.md", "_root"),
            doc("/patcher/usage", "patcher/usage.md", "patcher"),
            doc("/patcher/api/hooks", "patcher/api/hooks.md", "patcher"),
        ];
        DocsGraph {
            generated_at: Utc::now(),
            docs,
            sections: vec![
                section_node("_root", "", &["/intro", "/guides/setup"]),
                section_node("patcher", "patcher", &["/patcher/usage", "/patcher/api/hooks"]),
            ],
            assets: Vec::new(),
            asset_metadata: BTreeMap::new(),
        }
        .to_runtime()
    }

    fn repository() -> DocsRepository {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "patcher/img/shot.png".to_owned(),
            ImageDimensions {
                width: 800,
                height: 600,
            },
        );
        DocsRepository::new(runtime_graph()).unwrap().with_assets(
            vec!["patcher/img/shot.png".to_owned(), "files/a.pdf".to_owned()],
            metadata,
        )
    }

    fn config_error(graph: RuntimeDocsGraph) -> String {
        match DocsRepository::new(graph) {
            Err(GraphError::Configuration(message)) => message,
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_lookups() {
        let repo = repository();

        assert_eq!(
            repo.lookup_by_route("/patcher/usage").unwrap().source_path,
            "patcher/usage.md"
        );
        assert_eq!(
            repo.lookup_by_source("guides/setup.md").unwrap().route_path,
            "/guides/setup"
        );
        assert!(repo.lookup_by_route("/missing").is_none());
        assert_eq!(
            repo.all_routes(),
            vec!["/intro", "/guides/setup", "/patcher/usage", "/patcher/api/hooks"]
        );
    }

    #[test]
    fn test_duplicate_section_id() {
        let mut graph = runtime_graph();
        graph.sections.push(section_node("patcher", "patcher", &[]));

        assert_eq!(
            config_error(graph),
            "Duplicate section id 'patcher' in docs runtime graph"
        );
    }

    #[test]
    fn test_invalid_route_path() {
        let mut graph = runtime_graph();
        graph.docs[0].route_path = "intro".to_owned();

        assert_eq!(config_error(graph), "Invalid routePath for intro.md");
    }

    #[test]
    fn test_invalid_source_path() {
        let mut graph = runtime_graph();
        graph.docs[0].source_path = "intro.txt".to_owned();

        assert_eq!(config_error(graph), "Invalid sourcePath for /intro");
    }

    #[test]
    fn test_unknown_section() {
        let mut graph = runtime_graph();
        graph.docs[0].section_id = "ghost".to_owned();

        assert_eq!(
            config_error(graph),
            "Unknown section id 'ghost' in docs runtime graph"
        );
    }

    #[test]
    fn test_duplicate_route() {
        let mut graph = runtime_graph();
        graph.docs[1].route_path = "/intro".to_owned();

        assert_eq!(
            config_error(graph),
            "Duplicate route path '/intro' in docs runtime graph"
        );
    }

    #[test]
    fn test_section_references_unknown_route() {
        let mut graph = runtime_graph();
        graph.sections[1].pages.push("/patcher/gone".to_owned());

        assert_eq!(
            config_error(graph),
            "Section 'patcher' references unknown route '/patcher/gone'"
        );
    }

    #[test]
    fn test_resolve_link() {
        let repo = repository();

        assert_eq!(
            repo.resolve_link("patcher/usage.md", "api/hooks.md#setup")
                .unwrap()
                .as_deref(),
            Some("/patcher/api/hooks#setup")
        );
        assert_eq!(
            repo.resolve_link("patcher/api/hooks.md", "../../intro?tab=1")
                .unwrap()
                .as_deref(),
            Some("/intro?tab=1")
        );
        assert_eq!(
            repo.resolve_link("intro.md", "/guides/setup").unwrap().as_deref(),
            Some("/guides/setup")
        );
    }

    #[test]
    fn test_resolve_link_ignores_non_doc_hrefs() {
        let repo = repository();

        assert_eq!(repo.resolve_link("intro.md", "https://example.com").unwrap(), None);
        assert_eq!(repo.resolve_link("intro.md", "#local").unwrap(), None);
        assert_eq!(repo.resolve_link("intro.md", "files/a.pdf").unwrap(), None);
    }

    #[test]
    fn test_resolve_link_unresolved() {
        let err = repository().resolve_link("intro.md", "nope.md").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unresolved markdown link 'nope.md' in 'intro.md' (resolved 'nope.md')"
        );
    }

    #[test]
    fn test_resolve_link_escape() {
        let err = repository().resolve_link("intro.md", "../up.md").unwrap_err();

        assert!(matches!(err, GraphError::PathEscape(_)));
    }

    #[test]
    fn test_resolve_image_known_asset() {
        let image = repository()
            .resolve_image("patcher/usage.md", "img/shot.png?v=2", "/docs-assets/")
            .unwrap()
            .unwrap();

        assert_eq!(
            image,
            ResolvedImage {
                src: "/docs-assets/patcher/img/shot.png?v=2".to_owned(),
                dimensions: Some(ImageDimensions {
                    width: 800,
                    height: 600
                }),
            }
        );
    }

    #[test]
    fn test_resolve_image_static_assets() {
        let image = repository()
            .resolve_image("intro.md", "assets/logo.svg", "/docs-assets")
            .unwrap()
            .unwrap();

        assert_eq!(image.src, "/assets/logo.svg");
        assert_eq!(image.dimensions, None);
    }

    #[test]
    fn test_resolve_image_ignored_and_unresolved() {
        let repo = repository();

        assert_eq!(
            repo.resolve_image("intro.md", "/abs.png", "/a").unwrap(),
            None
        );
        let err = repo
            .resolve_image("patcher/usage.md", "missing.png", "/a")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unresolved image link 'missing.png' in 'patcher/usage.md' (resolved 'patcher/missing.png')"
        );
    }

    #[test]
    fn test_from_docs_graph_keeps_assets() {
        let graph = DocsGraph {
            generated_at: Utc::now(),
            docs: vec![doc("/intro", "intro.md", "_root")],
            sections: vec![section_node("_root", "", &["/intro"])],
            assets: vec!["logo.png".to_owned()],
            asset_metadata: BTreeMap::new(),
        };

        let repo = DocsRepository::from_docs_graph(&graph).unwrap();
        let image = repo.resolve_image("intro.md", "logo.png", "/x").unwrap();

        assert_eq!(image.unwrap().src, "/x/logo.png");
    }
}

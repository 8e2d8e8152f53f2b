//! Sidebar navigation and pagination.
//!
//! Built once from a [`DocsRepository`]; pages keep their section order and
//! pagination walks the flattened list of every section's pages.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::GraphError;
use crate::model::RuntimeDocNode;
use crate::repository::DocsRepository;

/// A page as listed in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsPage {
    /// Route relative to the section base path.
    pub slug: String,
    pub content_slug: String,
    /// Sidebar label.
    pub title: String,
    pub page_title: String,
    pub category: String,
    pub route_path: String,
    pub source_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsSection {
    pub id: String,
    pub title: String,
    pub base_path: String,
    pub is_page_anchor: bool,
    pub icon: String,
    pub order: i64,
    pub pages: Vec<DocsPage>,
}

/// Page fields sent to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDocsPage {
    pub title: String,
    pub category: String,
    pub route_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDocsSection {
    pub id: String,
    pub title: String,
    pub base_path: String,
    pub is_page_anchor: bool,
    pub icon: String,
    pub order: i64,
    pub pages: Vec<ClientDocsPage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationLink {
    pub route_path: String,
    pub title: String,
    pub section_id: String,
    pub section_title: String,
    pub section_icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub prev: Option<PaginationLink>,
    pub next: Option<PaginationLink>,
}

/// Everything a page view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteData<'a> {
    pub id: &'a str,
    pub slug: &'a str,
    pub route_path: &'a str,
    pub entry: &'a RuntimeDocNode,
    pub section: &'a DocsSection,
    pub page: &'a DocsPage,
    pub headings: &'a [dg_markdown::TocHeading],
    pub title: &'a str,
    pub edit_url: &'a str,
    pub pagination: Pagination,
}

/// Position of a route in the navigation.
#[derive(Debug, Clone, Copy)]
struct PageIndex {
    section: usize,
    page: usize,
    flat: usize,
}

/// Sidebar tree with route lookup and pagination.
#[derive(Debug)]
pub struct Navigation {
    sections: Vec<DocsSection>,
    by_route: HashMap<String, PageIndex>,
    ordered: Vec<PaginationLink>,
}

impl Navigation {
    /// Build navigation for every section of the repository's graph.
    ///
    /// # Errors
    ///
    /// Fails if a section lists a route that does not start with its base
    /// path.
    pub fn build(repository: &DocsRepository) -> Result<Self, GraphError> {
        let mut sections = Vec::new();
        for section in &repository.graph().sections {
            let mut pages = Vec::with_capacity(section.pages.len());
            for route_path in &section.pages {
                let doc = repository.lookup_by_route(route_path).ok_or_else(|| {
                    GraphError::config(format!("Missing doc for route '{route_path}'"))
                })?;
                pages.push(DocsPage {
                    slug: route_slug(route_path, &section.base_path)?.to_owned(),
                    content_slug: doc.content_slug.clone(),
                    title: doc.sidebar_label.clone(),
                    page_title: doc.title.clone(),
                    category: doc.category.clone(),
                    route_path: doc.route_path.clone(),
                    source_path: doc.source_path.clone(),
                });
            }
            sections.push(DocsSection {
                id: section.id.clone(),
                title: section.title.clone(),
                base_path: section.base_path.clone(),
                is_page_anchor: section.is_page_anchor,
                icon: section.icon.clone(),
                order: section.order,
                pages,
            });
        }

        let mut by_route = HashMap::new();
        let mut ordered = Vec::new();
        for (section_idx, section) in sections.iter().enumerate() {
            for (page_idx, page) in section.pages.iter().enumerate() {
                by_route.insert(
                    page.route_path.clone(),
                    PageIndex {
                        section: section_idx,
                        page: page_idx,
                        flat: ordered.len(),
                    },
                );
                ordered.push(PaginationLink {
                    route_path: page.route_path.clone(),
                    title: page.title.clone(),
                    section_id: section.id.clone(),
                    section_title: section.title.clone(),
                    section_icon: section.icon.clone(),
                });
            }
        }

        Ok(Self {
            sections,
            by_route,
            ordered,
        })
    }

    #[must_use]
    pub fn sections(&self) -> &[DocsSection] {
        &self.sections
    }

    /// Section and page for a route.
    #[must_use]
    pub fn page_info(&self, route_path: &str) -> Option<(&DocsSection, &DocsPage)> {
        let idx = self.by_route.get(route_path)?;
        let section = &self.sections[idx.section];
        Some((section, &section.pages[idx.page]))
    }

    /// Previous and next pages across all sections.
    ///
    /// Unknown routes have neither.
    #[must_use]
    pub fn pagination(&self, route_path: &str) -> Pagination {
        let Some(idx) = self.by_route.get(route_path) else {
            return Pagination::default();
        };
        Pagination {
            prev: idx
                .flat
                .checked_sub(1)
                .and_then(|i| self.ordered.get(i))
                .cloned(),
            next: self.ordered.get(idx.flat + 1).cloned(),
        }
    }

    /// Navigation without source paths, for the browser.
    #[must_use]
    pub fn client_sections(&self) -> Vec<ClientDocsSection> {
        self.sections
            .iter()
            .map(|section| ClientDocsSection {
                id: section.id.clone(),
                title: section.title.clone(),
                base_path: section.base_path.clone(),
                is_page_anchor: section.is_page_anchor,
                icon: section.icon.clone(),
                order: section.order,
                pages: section
                    .pages
                    .iter()
                    .map(|page| ClientDocsPage {
                        title: page.title.clone(),
                        category: page.category.clone(),
                        route_path: page.route_path.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Page view data for a route.
    ///
    /// # Errors
    ///
    /// Fails if the navigation names a source the repository does not know.
    pub fn route_data<'a>(
        &'a self,
        repository: &'a DocsRepository,
        route_path: &'a str,
    ) -> Result<Option<RouteData<'a>>, GraphError> {
        let Some((section, page)) = self.page_info(route_path) else {
            return Ok(None);
        };
        let entry = repository.lookup_by_source(&page.source_path).ok_or_else(|| {
            GraphError::config(format!(
                "Missing docs graph entry for {}",
                page.source_path
            ))
        })?;

        Ok(Some(RouteData {
            id: &entry.source_path,
            slug: route_path.strip_prefix('/').unwrap_or(route_path),
            route_path,
            entry,
            section,
            page,
            headings: &entry.headings,
            title: &entry.title,
            edit_url: &entry.edit_url,
            pagination: self.pagination(route_path),
        }))
    }
}

/// Route relative to a section base path.
fn route_slug<'a>(route_path: &'a str, base_path: &str) -> Result<&'a str, GraphError> {
    if base_path.is_empty() {
        return Ok(route_path.strip_prefix('/').unwrap_or(route_path));
    }
    route_path
        .strip_prefix('/')
        .and_then(|rest| rest.strip_prefix(base_path))
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| {
            GraphError::config(format!(
                "Route '{route_path}' does not match section base path '{base_path}'"
            ))
        })
}

//! Section registry.
//!
//! Sections are the top-level groups of the site. The first path segment of
//! a source file selects its section; files outside any registered section
//! belong to the root section.

use std::collections::HashSet;

use crate::error::GraphError;

/// Id of the catch-all section for top-level pages and unregistered folders.
pub const ROOT_SECTION_ID: &str = "_root";

/// Repository hosting a section's sources, used for edit links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub name: String,
    pub branch: String,
    /// Directory of the docs inside the repository (e.g., "docs").
    pub docs_path: String,
}

/// Declared section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDef {
    pub id: String,
    pub label: String,
    pub order: i64,
    pub icon: String,
    pub repo: RepoRef,
}

/// Validated set of sections plus the edit link base.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<SectionDef>,
    edit_base_url: String,
}

impl SectionRegistry {
    /// Create a registry.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Configuration`] if section ids repeat or the
    /// root section is missing.
    pub fn new(
        sections: Vec<SectionDef>,
        edit_base_url: impl Into<String>,
    ) -> Result<Self, GraphError> {
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(GraphError::config(format!(
                    "Duplicate section id '{}'",
                    section.id
                )));
            }
        }
        if !seen.contains(ROOT_SECTION_ID) {
            return Err(GraphError::config(format!(
                "Missing section definition for '{ROOT_SECTION_ID}'"
            )));
        }

        Ok(Self {
            sections,
            edit_base_url: edit_base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Look up a section by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SectionDef> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub(crate) fn require(&self, id: &str) -> Result<&SectionDef, GraphError> {
        self.get(id)
            .ok_or_else(|| GraphError::config(format!("Missing section definition for '{id}'")))
    }

    /// Section owning a top-level directory.
    ///
    /// Only registered non-root ids claim a directory; everything else falls
    /// back to the root section.
    #[must_use]
    pub fn resolve_section_id<'a>(&self, dir_name: &'a str) -> &'a str {
        if dir_name != ROOT_SECTION_ID && self.get(dir_name).is_some() {
            dir_name
        } else {
            ROOT_SECTION_ID
        }
    }

    /// Sections sorted by `order`, ties kept in declaration order.
    #[must_use]
    pub fn ordered(&self) -> Vec<&SectionDef> {
        let mut ordered: Vec<&SectionDef> = self.sections.iter().collect();
        ordered.sort_by_key(|s| s.order);
        ordered
    }

    /// Build the "edit this page" URL for a source file.
    ///
    /// Non-root sections live in their own repository, so the section prefix
    /// is stripped from the path.
    pub fn edit_url(&self, section_id: &str, source_path: &str) -> Result<String, GraphError> {
        let repo = &self.require(section_id)?.repo;
        let repo_relative = if section_id == ROOT_SECTION_ID {
            source_path
        } else {
            source_path
                .strip_prefix(section_id)
                .and_then(|rest| rest.strip_prefix('/'))
                .ok_or_else(|| {
                    GraphError::config(format!(
                        "Source path '{source_path}' does not match section prefix '{section_id}/'"
                    ))
                })?
        };

        Ok(format!(
            "{}/{}/edit/{}/{}/{repo_relative}",
            self.edit_base_url, repo.name, repo.branch, repo.docs_path
        ))
    }
}

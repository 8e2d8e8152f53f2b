//! Cross-reference validation.
//!
//! Every internal link must resolve to a known document (and, with a
//! fragment, to one of its heading anchors); every internal image must
//! resolve to a known asset. All problems are collected before failing so a
//! single run reports everything that is broken.

use std::collections::{HashMap, HashSet};

use dg_markdown::ParsedHref;
use dg_markdown::href::{decode_anchor, resolve_relative_path};

use crate::error::GraphError;

/// Reference data of one parsed document.
#[derive(Debug, Clone, Default)]
pub struct DocReferences {
    pub source_path: String,
    pub links: Vec<ParsedHref>,
    pub images: Vec<ParsedHref>,
    /// All heading ids issued in the document, H1 included.
    pub heading_anchors: HashSet<String>,
}

/// Collects validation issues.
#[derive(Debug, Default)]
pub struct ValidationReporter {
    issues: Vec<String>,
}

impl ValidationReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, message: String) {
        self.issues.push(message);
    }

    #[must_use]
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Fail with every reported issue, or succeed if there were none.
    pub fn finish(self) -> Result<(), GraphError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(GraphError::ReferenceValidation(self.issues))
        }
    }
}

/// Check every link and image of every document.
///
/// # Errors
///
/// Returns [`GraphError::ReferenceValidation`] listing every broken
/// reference, in document order.
pub fn validate_references(
    docs: &[DocReferences],
    assets: &HashSet<String>,
) -> Result<(), GraphError> {
    let mut reporter = ValidationReporter::new();
    check_references(docs, assets, &mut reporter);
    reporter.finish()
}

fn check_references(
    docs: &[DocReferences],
    assets: &HashSet<String>,
    reporter: &mut ValidationReporter,
) {
    let by_source: HashMap<&str, &DocReferences> =
        docs.iter().map(|d| (d.source_path.as_str(), d)).collect();

    for doc in docs {
        let source = &doc.source_path;

        for link in &doc.links {
            let resolved = match resolve_relative_path(source, &link.target_path) {
                Ok(resolved) => resolved,
                Err(err) => {
                    reporter.report(format!(
                        "Invalid markdown link in '{source}': '{}' ({err})",
                        link.full_href
                    ));
                    continue;
                }
            };

            let Some(target) = by_source.get(resolved.as_str()) else {
                reporter.report(format!(
                    "Unresolved markdown link in '{source}': '{}' resolves to '{resolved}'",
                    link.full_href
                ));
                continue;
            };

            if !link.hash.is_empty() {
                let anchor = decode_anchor(&link.hash);
                if !target.heading_anchors.contains(&anchor) {
                    reporter.report(format!(
                        "Unresolved markdown anchor in '{source}': '{}' points to missing '#{anchor}' in '{resolved}'",
                        link.full_href
                    ));
                }
            }
        }

        for image in &doc.images {
            match resolve_relative_path(source, &image.target_path) {
                Ok(resolved) if assets.contains(&resolved) => {}
                Ok(resolved) => reporter.report(format!(
                    "Unresolved image link in '{source}': '{}' resolves to '{resolved}'",
                    image.full_href
                )),
                Err(err) => reporter.report(format!(
                    "Invalid image link in '{source}': '{}' ({err})",
                    image.full_href
                )),
            }
        }
    }
}

//! Markdown structure extraction for docsgraph.
//!
//! Parses a single document body (frontmatter already removed) with
//! `pulldown-cmark` and extracts what the docs graph needs:
//!
//! - **Headings** with GitHub-style anchors, unique per document
//! - **Search sections**: text between consecutive headings
//! - **Plain text** of the whole document
//! - **References**: internal markdown links and local images
//!
//! The [`href`] module classifies and resolves link targets; [`slugify`]
//! produces URL-safe path segments.
//!
//! # Example
//!
//! ```
//! use dg_markdown::extract;
//!
//! let result = extract("# Guide\n\n## Install\n\nSee [usage](usage.md).").unwrap();
//! assert_eq!(result.primary_title.as_deref(), Some("Guide"));
//! assert_eq!(result.headings[0].id, "install");
//! assert_eq!(result.links[0].target_path, "usage.md");
//! ```

mod extract;
pub mod href;
mod slug;

pub use extract::{Extraction, SearchSection, TocHeading, extract, parser_options};
pub use href::{HrefError, ParsedHref};
pub use slug::{HeadingSlugger, heading_slug, slugify};

/// Error extracting structure from a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("Duplicate heading id '{id}'")]
    DuplicateHeadingId { id: String },
}

//! Docs graph assembly for docsgraph.
//!
//! Turns a tree of markdown sources into a validated graph of pages and
//! sections:
//!
//! - **Routing**: section, slug and route path derived from each source path
//!   and its frontmatter ([`derive_doc_location`])
//! - **Assembly**: parallel parsing, uniqueness checks and section ordering
//!   ([`GraphBuilder`])
//! - **Validation**: every internal link, anchor and image checked, with all
//!   problems reported at once ([`validate_references`])
//! - **Runtime access**: route and source lookups plus render-time link
//!   rewriting ([`DocsRepository`]), sidebar and pagination ([`Navigation`])
//! - **Export**: the `llms.txt` text dump ([`build_llms_document`])
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use dg_graph::{DocsRepository, GraphBuilder, Navigation};
//! use dg_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let graph = GraphBuilder::new(storage, sections).build()?;
//! let repository = DocsRepository::from_docs_graph(&graph)?;
//! let navigation = Navigation::build(&repository)?;
//! ```

mod builder;
mod error;
mod frontmatter;
mod llms;
mod location;
mod model;
mod navigation;
mod repository;
mod sections;
mod validate;

pub use builder::GraphBuilder;
pub use error::GraphError;
pub use frontmatter::{Frontmatter, parse_frontmatter, split_frontmatter};
pub use llms::build_llms_document;
pub use location::{
    DocLocation, derive_doc_location, slugify_path, strip_markdown_extension, title_case,
};
pub use model::{DocNode, DocsGraph, RuntimeDocNode, RuntimeDocsGraph, SectionNode};
pub use navigation::{
    ClientDocsPage, ClientDocsSection, DocsPage, DocsSection, Navigation, Pagination,
    PaginationLink, RouteData,
};
pub use repository::{DocsRepository, ResolvedImage};
pub use sections::{ROOT_SECTION_ID, RepoRef, SectionDef, SectionRegistry};
pub use validate::{DocReferences, ValidationReporter, validate_references};

//! Full-text search for docsgraph.
//!
//! Flattens a [`DocsGraph`](dg_graph::DocsGraph) into [`SearchRecord`]s (one
//! per page section) and indexes them into a serializable [`SearchIndex`]
//! with field boosts, prefix matching and typo tolerance.
//!
//! # Example
//!
//! ```ignore
//! use dg_search::{SearchIndex, SearchOptions};
//!
//! let index = SearchIndex::from_graph(&graph, SearchOptions::default());
//! std::fs::write("search-index.json", index.to_json()?)?;
//!
//! for hit in index.search("install plugin") {
//!     println!("{} ({:.2})", hit.record.title, hit.score);
//! }
//! ```

mod index;
mod record;
mod snippet;

pub use index::{
    CombineWith, Field, FieldBoost, Posting, SearchHit, SearchIndex, SearchOptions, tokenize,
};
pub use record::{SearchRecord, build_records};
pub use snippet::{highlight_match, snippet};

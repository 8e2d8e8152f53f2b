//! Slug generation for paths and headings.

use std::collections::{HashMap, HashSet};

use unicode_normalization::UnicodeNormalization;

use crate::ExtractError;

/// Convert one path segment to a URL-safe slug.
///
/// Applies NFKD, strips combining diacritics, drops everything except
/// letters, numbers, whitespace, `_` and `-`, lowercases, and joins the
/// remaining words with single dashes. May return an empty string.
///
/// # Examples
///
/// ```
/// use dg_markdown::slugify;
///
/// assert_eq!(slugify("Getting Started!"), "getting-started");
/// assert_eq!(slugify("Café_Guide"), "cafe-guide");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let lowered = value
        .nfkd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-'))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_dash = true;
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push(c);
    }
    slug
}

/// GitHub-style heading anchor.
///
/// Lowercases, removes punctuation and symbols, and turns every space into a
/// dash. Runs of spaces are not collapsed.
#[must_use]
pub fn heading_slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Issues unique heading ids within one document.
///
/// The first heading with a given base slug gets the base; later ones get
/// `-2`, `-3`, ... A suffixed id can still collide with a literal heading
/// (`Foo` twice, then `Foo 2`), which is reported as an error.
#[derive(Debug, Default)]
pub struct HeadingSlugger {
    occurrences: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl HeadingSlugger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the id for a heading with the given text.
    pub fn slug(&mut self, text: &str) -> Result<String, ExtractError> {
        let base = heading_slug(text);
        let count = self.occurrences.entry(base.clone()).or_default();
        *count += 1;
        let id = match *count {
            1 => base,
            n => format!("{base}-{n}"),
        };

        if !self.issued.insert(id.clone()) {
            return Err(ExtractError::DuplicateHeadingId { id });
        }
        Ok(id)
    }
}

//! Routing derived from source paths.
//!
//! Pure functions: given a docs-root-relative source path and an optional
//! slug override, compute the owning section, content slug, category, URL
//! slug and route path.

use dg_markdown::slugify;

use crate::error::GraphError;
use crate::sections::{ROOT_SECTION_ID, SectionRegistry};

/// Where a document lives in the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLocation {
    pub section_id: String,
    /// Path below the section, without extension.
    pub content_slug: String,
    /// URL-safe slug, never empty.
    pub slug: String,
    pub route_path: String,
    /// Intermediate folders joined by `" / "`.
    pub category: String,
}

/// Strip a trailing `.md`, ignoring case.
#[must_use]
pub fn strip_markdown_extension(path: &str) -> &str {
    match path.len().checked_sub(3).and_then(|idx| path.get(idx..)) {
        Some(ext) if ext.eq_ignore_ascii_case(".md") => &path[..path.len() - 3],
        _ => path,
    }
}

/// Slugify every `/`-separated segment of `value`.
///
/// # Errors
///
/// Fails if `value` is empty once outer slashes are trimmed, or if any
/// segment slugifies to nothing (only punctuation or emoji).
pub fn slugify_path(value: &str, source_path: &str) -> Result<String, GraphError> {
    let trimmed = value.trim_matches('/');
    if trimmed.trim().is_empty() {
        return Err(GraphError::config(format!(
            "Invalid empty slug override in '{source_path}'"
        )));
    }

    let mut slugs = Vec::new();
    for segment in trimmed.split('/').filter(|s| !s.is_empty()) {
        let slug = slugify(segment);
        if slug.is_empty() {
            return Err(GraphError::config(format!(
                "Slug segment '{segment}' in '{source_path}' produced an empty slug \
                 (contains only special characters or emoji)"
            )));
        }
        slugs.push(slug);
    }
    Ok(slugs.join("/"))
}

/// Title from a file name: separators become spaces, words are capitalized.
///
/// ```
/// use dg_graph::title_case;
///
/// assert_eq!(title_case("getting-started"), "Getting Started");
/// assert_eq!(title_case("api_v2"), "Api V2");
/// ```
#[must_use]
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric();
        if is_word && !in_word {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        in_word = is_word;
    }
    result
}

/// Derive the location of a source file.
///
/// # Errors
///
/// Returns [`GraphError::Configuration`] for a path with no segments or an
/// unusable slug.
pub fn derive_doc_location(
    source_path: &str,
    slug_override: Option<&str>,
    sections: &SectionRegistry,
) -> Result<DocLocation, GraphError> {
    let parts: Vec<&str> = strip_markdown_extension(source_path)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let (section_id, content_slug, category) = match parts.as_slice() {
        [] => {
            return Err(GraphError::config(format!(
                "Invalid docs path: {source_path}"
            )));
        }
        [only] => (ROOT_SECTION_ID, (*only).to_owned(), String::new()),
        [top, rest @ ..] => match sections.resolve_section_id(top) {
            ROOT_SECTION_ID => (ROOT_SECTION_ID, parts.join("/"), (*top).to_owned()),
            section_id => {
                let category = rest[..rest.len() - 1].join(" / ");
                (section_id, rest.join("/"), category)
            }
        },
    };

    let slug = slugify_path(slug_override.unwrap_or(&content_slug), source_path)?;
    let route_path = if section_id == ROOT_SECTION_ID {
        format!("/{slug}")
    } else {
        format!("/{section_id}/{slug}")
    };

    Ok(DocLocation {
        section_id: section_id.to_owned(),
        content_slug,
        slug,
        route_path,
        category,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sections::tests::registry;

    fn location(path: &str, slug: Option<&str>) -> DocLocation {
        derive_doc_location(path, slug, &registry()).unwrap()
    }

    #[test]
    fn test_strip_markdown_extension() {
        assert_eq!(strip_markdown_extension("intro.md"), "intro");
        assert_eq!(strip_markdown_extension("a/B.MD"), "a/B");
        assert_eq!(strip_markdown_extension("logo.png"), "logo.png");
        assert_eq!(strip_markdown_extension("md"), "md");
        assert_eq!(strip_markdown_extension("é.md"), "é");
    }

    #[test]
    fn test_single_segment_is_root() {
        assert_eq!(
            location("intro.md", None),
            DocLocation {
                section_id: "_root".to_owned(),
                content_slug: "intro".to_owned(),
                slug: "intro".to_owned(),
                route_path: "/intro".to_owned(),
                category: String::new(),
            }
        );
    }

    #[test]
    fn test_registered_section() {
        assert_eq!(
            location("patcher/Getting Started!.md", None),
            DocLocation {
                section_id: "patcher".to_owned(),
                content_slug: "Getting Started!".to_owned(),
                slug: "getting-started".to_owned(),
                route_path: "/patcher/getting-started".to_owned(),
                category: String::new(),
            }
        );
    }

    #[test]
    fn test_nested_category() {
        let loc = location("patcher/api/advanced/hooks.md", None);

        assert_eq!(loc.content_slug, "api/advanced/hooks");
        assert_eq!(loc.category, "api / advanced");
        assert_eq!(loc.route_path, "/patcher/api/advanced/hooks");
    }

    #[test]
    fn test_unregistered_folder_falls_back_to_root() {
        let loc = location("guides/setup/linux.md", None);

        assert_eq!(loc.section_id, "_root");
        assert_eq!(loc.content_slug, "guides/setup/linux");
        assert_eq!(loc.category, "guides");
        assert_eq!(loc.route_path, "/guides/setup/linux");
    }

    #[test]
    fn test_root_folder_is_not_a_section() {
        let loc = location("_root/page.md", None);

        assert_eq!(loc.section_id, "_root");
        assert_eq!(loc.category, "_root");
        assert_eq!(loc.slug, "root/page");
    }

    #[test]
    fn test_slug_override() {
        let loc = location("patcher/old-name.md", Some("/New Name/"));

        assert_eq!(loc.slug, "new-name");
        assert_eq!(loc.route_path, "/patcher/new-name");
        assert_eq!(loc.content_slug, "old-name");
    }

    #[test]
    fn test_empty_slug_override() {
        let err = derive_doc_location("intro.md", Some("  "), &registry()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid empty slug override in 'intro.md'");

        let err = derive_doc_location("intro.md", Some("//"), &registry()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid empty slug override in 'intro.md'");
    }

    #[test]
    fn test_emoji_segment() {
        let err = derive_doc_location("patcher/🚀.md", None, &registry()).unwrap_err();

        assert!(matches!(err, GraphError::Configuration(_)));
        assert!(err.to_string().contains("Slug segment '🚀' in 'patcher/🚀.md'"));
    }

    #[test]
    fn test_invalid_path() {
        let err = derive_doc_location(".md", None, &registry()).unwrap_err();

        assert_eq!(err.to_string(), "Invalid docs path: .md");
    }

    #[test]
    fn test_slug_determinism() {
        let a = location("manager/Ünïcode Guide.md", None);
        let b = location("manager/Ünïcode Guide.md", None);

        assert_eq!(a, b);
        assert_eq!(a.slug, "unicode-guide");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("intro"), "Intro");
        assert_eq!(title_case("getting-started"), "Getting Started");
        assert_eq!(title_case("faq_and_help"), "Faq And Help");
        assert_eq!(title_case("v2.0-notes"), "V2.0 Notes");
    }
}

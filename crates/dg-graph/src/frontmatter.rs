//! YAML frontmatter handling.
//!
//! A document may start with a `---` fenced YAML block. Known keys are read
//! into [`Frontmatter`]; unknown keys are ignored, and keys holding a value of
//! the wrong type are treated as absent. Sidebar order is the exception: a
//! value that is neither a number nor a numeric string is rejected.

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::GraphError;

/// Typed frontmatter of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Slug override. An empty string is kept so the resolver can reject it.
    pub slug: Option<String>,
    pub sidebar_label: Option<String>,
    pub sidebar_order: Option<f64>,
    /// `false` excludes the page from the LLM text export.
    pub llms: bool,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            slug: None,
            sidebar_label: None,
            sidebar_order: None,
            llms: true,
        }
    }
}

/// Keys as written, before type checks.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontmatter {
    title: Option<Value>,
    description: Option<Value>,
    slug: Option<Value>,
    sidebar: Option<Value>,
    sidebar_label: Option<Value>,
    sidebar_position: Option<Value>,
    sidebar_order: Option<Value>,
    llms: Option<Value>,
}

/// Split a raw file into its frontmatter block (if any) and body.
///
/// The opening fence must be the first line; the block ends at the next line
/// consisting of `---`. Without a closing fence the file has no frontmatter.
#[must_use]
pub fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some(after_fence) = text.strip_prefix("---") else {
        return (None, text);
    };
    let Some((fence_rest, block)) = after_fence.split_once('\n') else {
        return (None, text);
    };
    if !fence_rest.trim().is_empty() {
        return (None, text);
    }

    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&block[..offset]), &block[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parse frontmatter and return it with the remaining body.
///
/// # Errors
///
/// Returns [`GraphError::Configuration`] for malformed YAML or an invalid
/// sidebar order.
pub fn parse_frontmatter<'a>(
    raw: &'a str,
    source_path: &str,
) -> Result<(Frontmatter, &'a str), GraphError> {
    let (block, body) = split_frontmatter(raw);
    let Some(block) = block else {
        return Ok((Frontmatter::default(), body));
    };

    let value: Value = serde_yaml::from_str(block).map_err(|e| {
        GraphError::config(format!("Invalid frontmatter in '{source_path}': {e}"))
    })?;
    if !value.is_mapping() {
        return Ok((Frontmatter::default(), body));
    }
    let data: RawFrontmatter = serde_yaml::from_value(value).map_err(|e| {
        GraphError::config(format!("Invalid frontmatter in '{source_path}': {e}"))
    })?;

    let sidebar = data.sidebar.as_ref().filter(|v| v.is_mapping());
    let sidebar_label = sidebar
        .and_then(|s| s.get("label"))
        .and_then(trimmed_string)
        .or_else(|| data.sidebar_label.as_ref().and_then(trimmed_string));

    let order_raw = sidebar
        .and_then(|s| s.get("order"))
        .filter(|v| !v.is_null())
        .or(data.sidebar_position.as_ref())
        .or(data.sidebar_order.as_ref());

    Ok((
        Frontmatter {
            title: data.title.as_ref().and_then(trimmed_string).filter(|s| !s.is_empty()),
            description: data.description.as_ref().and_then(trimmed_string),
            slug: data.slug.as_ref().and_then(trimmed_string),
            sidebar_label: sidebar_label.filter(|s| !s.is_empty()),
            sidebar_order: parse_sidebar_order(order_raw, source_path)?,
            llms: !matches!(data.llms, Some(Value::Bool(false))),
        },
        body,
    ))
}

fn trimmed_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_owned())
}

fn parse_sidebar_order(value: Option<&Value>, source_path: &str) -> Result<Option<f64>, GraphError> {
    let invalid = |value: &Value| {
        let shown = serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"));
        GraphError::config(format!(
            "Invalid sidebar order in {source_path}: expected a number, got {shown}"
        ))
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64().filter(|f| f.is_finite())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v @ Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(invalid(v)),
        },
        Some(other) => Err(invalid(other)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(raw: &str) -> Frontmatter {
        parse_frontmatter(raw, "test.md").unwrap().0
    }

    #[test]
    fn test_split_without_frontmatter() {
        assert_eq!(split_frontmatter("# Title\n"), (None, "# Title\n"));
        assert_eq!(split_frontmatter("---"), (None, "---"));
    }

    #[test]
    fn test_split_with_frontmatter() {
        let (block, body) = split_frontmatter("---\ntitle: Hi\n---\n# Body\n");

        assert_eq!(block, Some("title: Hi\n"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_split_crlf_and_bom() {
        let (block, body) = split_frontmatter("\u{feff}---\r\ntitle: Hi\r\n---\r\nBody");

        assert_eq!(block, Some("title: Hi\r\n"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_unterminated() {
        let raw = "---\ntitle: Hi\n# Body\n";

        assert_eq!(split_frontmatter(raw), (None, raw));
    }

    #[test]
    fn test_parse_defaults() {
        let (fm, body) = parse_frontmatter("# Just markdown", "a.md").unwrap();

        assert_eq!(fm, Frontmatter::default());
        assert!(fm.llms);
        assert_eq!(body, "# Just markdown");
    }

    #[test]
    fn test_parse_empty_block() {
        assert_eq!(parse("---\n---\nBody"), Frontmatter::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let fm = parse(
            "---\ntitle: '  Install  '\ndescription: How to install\nslug: custom/path\nsidebar:\n  label: Setup\n  order: 3\nllms: false\nunknown: ignored\n---\n",
        );

        assert_eq!(
            fm,
            Frontmatter {
                title: Some("Install".to_owned()),
                description: Some("How to install".to_owned()),
                slug: Some("custom/path".to_owned()),
                sidebar_label: Some("Setup".to_owned()),
                sidebar_order: Some(3.0),
                llms: false,
            }
        );
    }

    #[test]
    fn test_parse_ignores_non_string_fields() {
        let fm = parse("---\ntitle: 42\ndescription: [a, b]\nsidebar_label: true\n---\n");

        assert_eq!(fm.title, None);
        assert_eq!(fm.description, None);
        assert_eq!(fm.sidebar_label, None);
    }

    #[test]
    fn test_parse_flat_sidebar_keys() {
        let fm = parse("---\nsidebar_label: Flat\nsidebar_position: 2\n---\n");
        assert_eq!(fm.sidebar_label.as_deref(), Some("Flat"));
        assert_eq!(fm.sidebar_order, Some(2.0));

        let fm = parse("---\nsidebar_order: '1.5'\n---\n");
        assert_eq!(fm.sidebar_order, Some(1.5));
    }

    #[test]
    fn test_parse_sidebar_order_precedence() {
        let fm = parse("---\nsidebar:\n  order: 1\nsidebar_position: 2\nsidebar_order: 3\n---\n");
        assert_eq!(fm.sidebar_order, Some(1.0));

        let fm = parse("---\nsidebar:\n  order: null\nsidebar_position: 2\n---\n");
        assert_eq!(fm.sidebar_order, Some(2.0));
    }

    #[test]
    fn test_parse_invalid_sidebar_order() {
        let err = parse_frontmatter("---\nsidebar_position: first\n---\n", "guide.md").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid sidebar order in guide.md: expected a number, got \"first\""
        );

        let err = parse_frontmatter("---\nsidebar_order: true\n---\n", "guide.md").unwrap_err();
        assert!(matches!(err, GraphError::Configuration(_)));
    }

    #[test]
    fn test_parse_empty_slug_kept() {
        assert_eq!(parse("---\nslug: '   '\n---\n").slug.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let err = parse_frontmatter("---\ntitle: [unclosed\n---\n", "bad.md").unwrap_err();

        assert!(err.to_string().starts_with("Invalid frontmatter in 'bad.md'"));
    }

    #[test]
    fn test_parse_llms_only_false_excludes() {
        assert!(parse("---\nllms: true\n---\n").llms);
        assert!(parse("---\nllms: 'no'\n---\n").llms);
        assert!(!parse("---\nllms: false\n---\n").llms);
    }
}

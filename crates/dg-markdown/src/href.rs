//! Href classification and resolution.
//!
//! Markdown links and images are classified into internal candidates (checked
//! against the document set) and everything else (external URLs, in-page
//! anchors, non-markdown link targets), which is ignored.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// An internal link or image target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHref {
    /// Href exactly as written in the source.
    pub full_href: String,
    /// Path part, with `.md` / `README.md` completion applied for links.
    pub target_path: String,
    /// Query without the leading `?` (empty when absent).
    pub query: String,
    /// Fragment without the leading `#` (empty when absent).
    pub hash: String,
}

/// Href split into its path, query and fragment parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrefParts<'a> {
    pub pathname: &'a str,
    pub query: &'a str,
    pub hash: &'a str,
}

/// Error resolving a relative path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HrefError {
    #[error("Relative path escapes docs root: {target}")]
    PathEscape { target: String },
}

/// Split an href into pathname, query and hash.
///
/// The fragment is split off first, so a `?` inside the fragment stays there.
#[must_use]
pub fn split_href(href: &str) -> HrefParts<'_> {
    let (rest, hash) = href.split_once('#').unwrap_or((href, ""));
    let (pathname, query) = rest.split_once('?').unwrap_or((rest, ""));
    HrefParts {
        pathname,
        query,
        hash,
    }
}

/// Check whether an href points outside the site.
///
/// Protocol-relative hrefs (`//host/...`) and anything starting with a URL
/// scheme (`https:`, `mailto:`, ...) are external.
#[must_use]
pub fn is_external_href(href: &str) -> bool {
    href.starts_with("//") || has_scheme(href)
}

fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Lowercased extension of the last path segment, including the dot.
///
/// Dotfiles (`.env`) have no extension.
fn extension(pathname: &str) -> String {
    let name = pathname.rsplit('/').next().unwrap_or(pathname);
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// Classify a link href as a markdown document reference.
///
/// Returns `None` for anchors, external URLs, empty paths and targets with a
/// non-markdown extension. Extension-less targets get `.md` appended, or
/// `README.md` when they end in `/`.
#[must_use]
pub fn parse_doc_href(href: &str) -> Option<ParsedHref> {
    if href.starts_with('#') || is_external_href(href) {
        return None;
    }

    let parts = split_href(href);
    if parts.pathname.is_empty() {
        return None;
    }

    let ext = extension(parts.pathname);
    let target_path = match ext.as_str() {
        ".md" => parts.pathname.to_owned(),
        "" if parts.pathname.ends_with('/') => format!("{}README.md", parts.pathname),
        "" => format!("{}.md", parts.pathname),
        _ => return None,
    };

    Some(ParsedHref {
        full_href: href.to_owned(),
        target_path,
        query: parts.query.to_owned(),
        hash: parts.hash.to_owned(),
    })
}

/// Classify an image src as a local asset reference.
///
/// Site-absolute (`/...`) sources are served as-is and ignored, as are
/// markdown targets.
#[must_use]
pub fn parse_asset_href(href: &str) -> Option<ParsedHref> {
    if href.starts_with('#') || href.starts_with('/') || is_external_href(href) {
        return None;
    }

    let parts = split_href(href);
    if parts.pathname.is_empty() || parts.pathname.to_lowercase().ends_with(".md") {
        return None;
    }

    Some(ParsedHref {
        full_href: href.to_owned(),
        target_path: parts.pathname.to_owned(),
        query: parts.query.to_owned(),
        hash: parts.hash.to_owned(),
    })
}

/// Resolve `target` against the document at `current_source_path`.
///
/// A leading `/` makes the target docs-root-relative; otherwise it is
/// relative to the document's directory.
pub fn resolve_relative_path(current_source_path: &str, target: &str) -> Result<String, HrefError> {
    let joined = match target.strip_prefix('/') {
        Some(rooted) => Cow::Borrowed(rooted),
        None => match current_source_path.rfind('/') {
            Some(idx) => Cow::Owned(format!("{}/{target}", &current_source_path[..idx])),
            None => Cow::Borrowed(target),
        },
    };

    let normalized = normalize_posix(&joined);
    if normalized == ".." || normalized.starts_with("../") {
        return Err(HrefError::PathEscape {
            target: target.to_owned(),
        });
    }
    Ok(normalized)
}

/// Collapse `.` and `..` segments and duplicate slashes.
fn normalize_posix(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return ".".to_owned();
    }
    let mut normalized = segments.join("/");
    if path.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Recompose a resolved path with its query and fragment.
#[must_use]
pub fn with_query_and_hash(pathname: &str, query: &str, hash: &str) -> String {
    let mut href = pathname.to_owned();
    if !query.is_empty() {
        href.push('?');
        href.push_str(query);
    }
    if !hash.is_empty() {
        href.push('#');
        href.push_str(hash);
    }
    href
}

/// Percent-decode a fragment, keeping it raw if it is not valid UTF-8.
#[must_use]
pub fn decode_anchor(hash: &str) -> String {
    percent_decode_str(hash)
        .decode_utf8()
        .map_or_else(|_| hash.to_owned(), Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(href: &str) -> Option<(String, String, String)> {
        parse_doc_href(href).map(|p| (p.target_path, p.query, p.hash))
    }

    #[test]
    fn test_split_href_hash_first() {
        assert_eq!(
            split_href("guide.md?tab=1#setup"),
            HrefParts {
                pathname: "guide.md",
                query: "tab=1",
                hash: "setup"
            }
        );
        assert_eq!(
            split_href("guide.md#a?b"),
            HrefParts {
                pathname: "guide.md",
                query: "",
                hash: "a?b"
            }
        );
    }

    #[test]
    fn test_is_external_href() {
        assert!(is_external_href("https://example.com"));
        assert!(is_external_href("mailto:team@example.com"));
        assert!(is_external_href("//cdn.example.com/x.js"));
        assert!(is_external_href("git+ssh:repo"));
        assert!(!is_external_href("guide.md"));
        assert!(!is_external_href("./a:b.md"));
        assert!(!is_external_href("1http://x"));
        assert!(!is_external_href("/abs/path"));
    }

    #[test]
    fn test_parse_doc_href_ignores_non_doc_targets() {
        assert_eq!(doc("#local"), None);
        assert_eq!(doc("https://example.com/page.md"), None);
        assert_eq!(doc("image.png"), None);
        assert_eq!(doc("?only=query"), None);
    }

    #[test]
    fn test_parse_doc_href_completes_extension() {
        assert_eq!(
            doc("guide"),
            Some(("guide.md".to_owned(), String::new(), String::new()))
        );
        assert_eq!(
            doc("patcher/"),
            Some(("patcher/README.md".to_owned(), String::new(), String::new()))
        );
        assert_eq!(
            doc("../cli/usage.MD#flags"),
            Some(("../cli/usage.MD".to_owned(), String::new(), "flags".to_owned()))
        );
        assert_eq!(
            doc(".env"),
            Some((".env.md".to_owned(), String::new(), String::new()))
        );
    }

    #[test]
    fn test_parse_doc_href_keeps_full_href() {
        let parsed = parse_doc_href("intro.md?x=1#top").unwrap();

        assert_eq!(parsed.full_href, "intro.md?x=1#top");
        assert_eq!(parsed.query, "x=1");
        assert_eq!(parsed.hash, "top");
    }

    #[test]
    fn test_parse_asset_href() {
        let parsed = parse_asset_href("./img/logo.png?v=2").unwrap();
        assert_eq!(parsed.target_path, "./img/logo.png");
        assert_eq!(parsed.query, "v=2");

        assert_eq!(parse_asset_href("/static/logo.png"), None);
        assert_eq!(parse_asset_href("https://example.com/x.png"), None);
        assert_eq!(parse_asset_href("diagram.MD"), None);
        assert_eq!(parse_asset_href("#anchor"), None);
    }

    #[test]
    fn test_resolve_relative_path() {
        assert_eq!(
            resolve_relative_path("patcher/intro.md", "guide.md").unwrap(),
            "patcher/guide.md"
        );
        assert_eq!(
            resolve_relative_path("patcher/intro.md", "../cli/usage.md").unwrap(),
            "cli/usage.md"
        );
        assert_eq!(
            resolve_relative_path("patcher/a/b.md", "./../c.md").unwrap(),
            "patcher/c.md"
        );
        assert_eq!(
            resolve_relative_path("intro.md", "other.md").unwrap(),
            "other.md"
        );
        assert_eq!(
            resolve_relative_path("patcher/deep/intro.md", "/manager/faq.md").unwrap(),
            "manager/faq.md"
        );
    }

    #[test]
    fn test_resolve_relative_path_escape() {
        let err = resolve_relative_path("intro.md", "../outside.md").unwrap_err();

        assert_eq!(
            err,
            HrefError::PathEscape {
                target: "../outside.md".to_owned()
            }
        );
        assert_eq!(
            err.to_string(),
            "Relative path escapes docs root: ../outside.md"
        );
        assert!(resolve_relative_path("a/b.md", "../../x.md").is_err());
        assert!(resolve_relative_path("a/b.md", "/../x.md").is_err());
    }

    #[test]
    fn test_with_query_and_hash() {
        assert_eq!(with_query_and_hash("/patcher/intro", "", ""), "/patcher/intro");
        assert_eq!(
            with_query_and_hash("/patcher/intro", "a=1", "top"),
            "/patcher/intro?a=1#top"
        );
        assert_eq!(with_query_and_hash("/x", "", "h"), "/x#h");
    }

    #[test]
    fn test_decode_anchor() {
        assert_eq!(decode_anchor("caf%C3%A9"), "café");
        assert_eq!(decode_anchor("plain"), "plain");
        assert_eq!(decode_anchor("bad%FF"), "bad%FF");
    }
}

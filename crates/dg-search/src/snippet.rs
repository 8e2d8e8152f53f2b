//! Result presentation helpers: text snippets around the first match and
//! HTML highlighting of query terms.

const SNIPPET_MAX_LENGTH: usize = 140;
const SNIPPET_CONTEXT_CHARS: usize = 40;
const ELLIPSIS: &str = "...";
const HIGHLIGHT_TAG: &str = "mark";

/// Cut `text` down to a window around the first query term found.
///
/// Whitespace is collapsed first. The window starts a little before the match
/// and is marked with an ellipsis on every side where text was dropped.
/// A `max_len` of zero uses the default length.
#[must_use]
pub fn snippet(text: &str, query: &str, max_len: usize) -> String {
    let chars: Vec<char> = collapse_whitespace(text).chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let max_len = if max_len == 0 { SNIPPET_MAX_LENGTH } else { max_len };
    if chars.len() <= max_len {
        return chars.into_iter().collect();
    }

    let lower: Vec<char> = chars.iter().map(|&c| lower_char(c)).collect();
    let match_index = query_terms(query)
        .iter()
        .find_map(|term| find_chars(&lower, term))
        .unwrap_or(0);

    let start = match_index.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let end = (start + max_len).min(chars.len());

    let mut snippet: String = chars[start..end].iter().collect::<String>().trim().to_owned();
    if start > 0 {
        snippet.insert_str(0, ELLIPSIS);
    }
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Escape `text` for HTML and wrap every query term occurrence in `<mark>`.
///
/// Matching ignores ASCII case.
#[must_use]
pub fn highlight_match(text: &str, query: &str) -> String {
    let escaped = escape_html(text);
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| escape_html(t).to_ascii_lowercase())
        .collect();
    if terms.is_empty() {
        return escaped;
    }

    let lower = escaped.to_ascii_lowercase();
    let mut result = String::with_capacity(escaped.len());
    let mut pos = 0;
    while pos < escaped.len() {
        let found = terms
            .iter()
            .filter(|term| lower[pos..].starts_with(term.as_str()))
            .map(String::len)
            .next();
        match found {
            Some(len) => {
                result.push_str(&format!(
                    "<{HIGHLIGHT_TAG}>{}</{HIGHLIGHT_TAG}>",
                    &escaped[pos..pos + len]
                ));
                pos += len;
            }
            None => {
                let ch_len = escaped[pos..].chars().next().map_or(1, char::len_utf8);
                result.push_str(&escaped[pos..pos + ch_len]);
                pos += ch_len;
            }
        }
    }
    result
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Single-char lowercase so positions line up with the original text.
fn lower_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn query_terms(query: &str) -> Vec<Vec<char>> {
    query
        .split_whitespace()
        .map(|t| t.chars().map(lower_char).collect())
        .collect()
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_snippet_short_text() {
        assert_eq!(snippet("  short   text ", "x", 140), "short text");
        assert_eq!(snippet("   ", "x", 140), "");
    }

    #[test]
    fn test_snippet_around_match() {
        let text = format!("{} needle {}", "a ".repeat(60), "b ".repeat(60));

        let result = snippet(&text, "NEEDLE", 50);

        assert!(result.starts_with("..."));
        assert!(result.ends_with("..."));
        assert!(result.contains("needle"));
    }

    #[test]
    fn test_snippet_without_match_starts_at_beginning() {
        let text = "word ".repeat(50);

        let result = snippet(&text, "missing", 20);

        assert!(!result.starts_with("..."));
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_highlight_match() {
        assert_eq!(
            highlight_match("Install the <b>Patcher</b>", "patcher install"),
            "<mark>Install</mark> the &lt;b&gt;<mark>Patcher</mark>&lt;/b&gt;"
        );
    }

    #[test]
    fn test_highlight_empty_query() {
        assert_eq!(highlight_match("a & b", "  "), "a &amp; b");
    }
}

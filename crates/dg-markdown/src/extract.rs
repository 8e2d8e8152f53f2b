//! Structural extraction from a markdown body.
//!
//! The pulldown-cmark event stream is folded into a small typed tree first,
//! then walked twice: once over the top-level nodes to split the document
//! into heading-delimited search sections, and once over the whole tree to
//! collect link and image references.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use crate::ExtractError;
use crate::href::{ParsedHref, parse_asset_href, parse_doc_href};
use crate::slug::HeadingSlugger;

/// Table of contents entry (levels 2 through 6).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocHeading {
    /// Anchor ID for linking.
    pub id: String,
    /// Heading text.
    pub title: String,
    /// Heading level (2-6).
    pub level: u8,
}

/// Text between one heading and the next.
///
/// The span before the first heading has an empty `heading` and `anchor`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSection {
    pub heading: String,
    pub anchor: String,
    pub text: String,
}

/// Everything the graph needs from one document body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Text of the first non-empty top-level H1.
    pub primary_title: Option<String>,
    pub headings: Vec<TocHeading>,
    /// Every issued heading id, H1 included, in document order.
    pub heading_anchors: Vec<String>,
    pub search_sections: Vec<SearchSection>,
    /// Whole-document text, whitespace collapsed.
    pub plain_text: String,
    /// Internal markdown link candidates.
    pub links: Vec<ParsedHref>,
    /// Internal image candidates.
    pub images: Vec<ParsedHref>,
}

/// Parser options used for every document.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_GFM
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Heading { level: u8, children: Vec<Node> },
    Link { url: String, children: Vec<Node> },
    Image { url: String, children: Vec<Node> },
    Text(String),
    Block(Vec<Node>),
    Inline(Vec<Node>),
}

/// Open container while folding events.
enum Frame {
    Heading(u8),
    Link(String),
    Image(String),
    Block,
    Inline,
    /// Raw HTML and metadata blocks: dropped with their content.
    Skip,
}

impl Frame {
    fn from_tag(tag: Tag<'_>) -> Self {
        match tag {
            Tag::Heading { level, .. } => Self::Heading(heading_level_to_num(level)),
            Tag::Link { dest_url, .. } => Self::Link(dest_url.into_string()),
            Tag::Image { dest_url, .. } => Self::Image(dest_url.into_string()),
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough => Self::Inline,
            Tag::HtmlBlock | Tag::MetadataBlock(_) => Self::Skip,
            _ => Self::Block,
        }
    }

    fn close(self, children: Vec<Node>) -> Option<Node> {
        match self {
            Self::Heading(level) => Some(Node::Heading { level, children }),
            Self::Link(url) => Some(Node::Link { url, children }),
            Self::Image(url) => Some(Node::Image { url, children }),
            Self::Block => Some(Node::Block(children)),
            Self::Inline => Some(Node::Inline(children)),
            Self::Skip => None,
        }
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn parse_tree(markdown: &str) -> Vec<Node> {
    let mut root = Vec::new();
    let mut stack: Vec<(Frame, Vec<Node>)> = Vec::new();

    let mut push = |stack: &mut Vec<(Frame, Vec<Node>)>, node: Node| match stack.last_mut() {
        Some((_, children)) => children.push(node),
        None => root.push(node),
    };

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(tag) => stack.push((Frame::from_tag(tag), Vec::new())),
            Event::End(_) => {
                if let Some((frame, children)) = stack.pop()
                    && let Some(node) = frame.close(children)
                {
                    push(&mut stack, node);
                }
            }
            Event::Text(text)
            | Event::Code(text)
            | Event::InlineMath(text)
            | Event::DisplayMath(text) => push(&mut stack, Node::Text(text.into_string())),
            Event::SoftBreak | Event::HardBreak => push(&mut stack, Node::Text("\n".to_owned())),
            Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::Rule
            | Event::TaskListMarker(_) => {}
        }
    }

    root
}

fn push_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Heading { children, .. } | Node::Block(children) => {
            out.push(' ');
            for child in children {
                push_text(child, out);
            }
            out.push(' ');
        }
        Node::Link { children, .. } | Node::Image { children, .. } | Node::Inline(children) => {
            for child in children {
                push_text(child, out);
            }
        }
    }
}

fn raw_text<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> String {
    let mut out = String::new();
    for node in nodes {
        push_text(node, &mut out);
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_references(node: &Node, links: &mut Vec<ParsedHref>, images: &mut Vec<ParsedHref>) {
    let children = match node {
        Node::Text(_) => return,
        Node::Link { url, children } => {
            links.extend(parse_doc_href(url));
            children
        }
        Node::Image { url, children } => {
            images.extend(parse_asset_href(url));
            children
        }
        Node::Heading { children, .. } | Node::Block(children) | Node::Inline(children) => {
            children
        }
    };
    for child in children {
        collect_references(child, links, images);
    }
}

/// Accumulates the span between headings.
struct SectionSplitter<'a> {
    heading: String,
    anchor: String,
    nodes: Vec<&'a Node>,
    sections: Vec<SearchSection>,
}

impl<'a> SectionSplitter<'a> {
    fn new() -> Self {
        Self {
            heading: String::new(),
            anchor: String::new(),
            nodes: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if self.nodes.is_empty() && self.heading.is_empty() {
            return;
        }
        let text = collapse_whitespace(&raw_text(self.nodes.drain(..)));
        if !text.is_empty() {
            self.sections.push(SearchSection {
                heading: self.heading.clone(),
                anchor: self.anchor.clone(),
                text,
            });
        }
    }

    fn start(&mut self, heading: String, anchor: String) {
        self.flush();
        self.heading = heading;
        self.anchor = anchor;
    }

    fn push(&mut self, node: &'a Node) {
        self.nodes.push(node);
    }

    fn finish(mut self) -> Vec<SearchSection> {
        self.flush();
        self.sections
    }
}

/// Extract headings, search sections, plain text and references.
///
/// # Errors
///
/// Returns [`ExtractError::DuplicateHeadingId`] when two headings end up
/// with the same anchor.
pub fn extract(markdown: &str) -> Result<Extraction, ExtractError> {
    let tree = parse_tree(markdown);

    let mut slugger = HeadingSlugger::new();
    let mut splitter = SectionSplitter::new();
    let mut primary_title = None;
    let mut headings = Vec::new();
    let mut heading_anchors = Vec::new();

    for node in &tree {
        let Node::Heading { level, children } = node else {
            splitter.push(node);
            continue;
        };

        let slug_text = raw_text(children);
        let title = collapse_whitespace(&slug_text);
        let id = slugger.slug(&slug_text)?;

        if *level == 1 && primary_title.is_none() && !title.is_empty() {
            primary_title = Some(title.clone());
        }
        if (2..=6).contains(level) {
            headings.push(TocHeading {
                id: id.clone(),
                title: title.clone(),
                level: *level,
            });
        }
        heading_anchors.push(id.clone());
        splitter.start(title, id);
    }

    let mut links = Vec::new();
    let mut images = Vec::new();
    for node in &tree {
        collect_references(node, &mut links, &mut images);
    }

    Ok(Extraction {
        primary_title,
        headings,
        heading_anchors,
        search_sections: splitter.finish(),
        plain_text: collapse_whitespace(&raw_text(&tree)),
        links,
        images,
    })
}

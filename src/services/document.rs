//! Parsed page documents for the extractor.
//!
//! Pages arrive as raw HTML and are parsed with kuchiki (html5ever), so
//! malformed markup and character entities are handled the way a browser
//! would. `PageSource` is the thread-safe form the app keeps between
//! requests; `Document` is parsed from it on demand.

use kuchiki::iter::NodeEdge;
use kuchiki::traits::*;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td",
    "tfoot", "th", "thead", "tr", "ul",
];

const HIDDEN_TAGS: &[&str] = &[
    "head", "title", "meta", "link", "script", "style", "noscript", "template",
];

/// Raw page as pushed by the host shell.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSource {
    pub url: String,
    pub title: Option<String>,
    pub html: String,
}

impl PageSource {
    pub fn new(url: &str, title: Option<&str>, html: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.map(str::to_string),
            html: html.to_string(),
        }
    }

    pub fn parse(&self) -> Document {
        Document::parse(&self.url, self.title.as_deref(), &self.html)
    }
}

pub struct Document {
    pub url: String,
    title: Option<String>,
    root: NodeRef,
}

impl Document {
    /// Parses `html`. Never fails; the parser recovers from any markup.
    pub fn parse(url: &str, title: Option<&str>, html: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.map(str::to_string),
            root: kuchiki::parse_html().one(html),
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Title given by the host, else the `<title>` text with whitespace collapsed.
    pub fn title(&self) -> String {
        if let Some(t) = &self.title {
            return t.clone();
        }
        self.select_first("title")
            .map(|t| collapse_whitespace(&t.as_node().text_contents()))
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<NodeRef> {
        self.select_first("body").map(|b| b.as_node().clone())
    }

    /// Elements matching a CSS selector list in document order. An invalid selector matches nothing.
    pub fn select(&self, selectors: &str) -> Vec<NodeDataRef<ElementData>> {
        match self.root.select(selectors) {
            Ok(matches) => matches.collect(),
            Err(()) => Vec::new(),
        }
    }

    pub fn select_first(&self, selectors: &str) -> Option<NodeDataRef<ElementData>> {
        self.root.select_first(selectors).ok()
    }
}

/// Attribute value of an element, if present.
pub fn attr(element: &NodeDataRef<ElementData>, name: &str) -> Option<String> {
    element.attributes.borrow().get(name).map(str::to_string)
}

/// Rendered text of `node`: block elements on their own lines, whitespace
/// collapsed, head and script-like content skipped.
///
/// Walks the tree with an explicit traversal, so nesting depth is unbounded.
pub fn inner_text(node: &NodeRef) -> String {
    let mut raw = String::new();
    let mut hidden = 0usize;
    for edge in node.traverse_inclusive() {
        match edge {
            NodeEdge::Start(n) => {
                if let Some(el) = n.as_element() {
                    let tag = &*el.name.local;
                    if HIDDEN_TAGS.contains(&tag) {
                        hidden += 1;
                    } else if hidden == 0 && BLOCK_TAGS.contains(&tag) {
                        line_break(&mut raw);
                    }
                } else if hidden == 0 {
                    if let Some(text) = n.as_text() {
                        raw.push_str(&text.borrow());
                    }
                }
            }
            NodeEdge::End(n) => {
                if let Some(el) = n.as_element() {
                    let tag = &*el.name.local;
                    if HIDDEN_TAGS.contains(&tag) {
                        hidden = hidden.saturating_sub(1);
                    } else if hidden == 0 && BLOCK_TAGS.contains(&tag) {
                        line_break(&mut raw);
                    }
                }
            }
        }
    }
    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn line_break(raw: &mut String) {
    if !raw.is_empty() && !raw.ends_with('\n') {
        raw.push('\n');
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

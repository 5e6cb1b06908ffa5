//! Content Extractor for PageKeeper.
//!
//! Picks the most article-like block of a page with an ordered list of
//! selector strategies, and reads chat transcripts out of messaging pages.

use crate::services::document::{attr, inner_text, Document};
use crate::types::page::{ChatMessage, PageContent};

/// Attribute carrying the sender/timestamp prefix of a chat message.
pub const CHAT_META_ATTR: &str = "data-pre-plain-text";

/// How a strategy picks among the elements its selector matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// The first match in document order.
    First,
    /// The match with the longest text.
    Longest,
}

/// One extraction rule: accept the picked element if its text is longer than `min_chars`.
///
/// Lengths count Unicode scalar values, so text outside the Basic Multilingual
/// Plane counts one per character rather than two UTF-16 units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub selector: &'static str,
    pub min_chars: usize,
    pub pick: Pick,
}

/// Default strategies, highest priority first.
pub const DEFAULT_STRATEGIES: &[Strategy] = &[
    Strategy { selector: "article", min_chars: 100, pick: Pick::First },
    Strategy { selector: "main", min_chars: 100, pick: Pick::First },
    Strategy { selector: ".ii.gt", min_chars: 20, pick: Pick::First },
    Strategy { selector: "[aria-label='Message body']", min_chars: 20, pick: Pick::First },
    Strategy { selector: "div, section", min_chars: 300, pick: Pick::Longest },
];

/// Trait defining content extraction operations.
pub trait ContentExtractorTrait {
    /// Main text of the page. Never fails; falls back to the body text.
    fn extract(&self, doc: &Document) -> PageContent;
    /// The last `limit` non-empty chat messages of a messaging page.
    fn extract_chat(&self, doc: &Document, limit: usize) -> Vec<ChatMessage>;
}

/// Heuristic extractor driven by a strategy list.
pub struct ContentExtractor {
    strategies: Vec<Strategy>,
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self {
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    pub fn with_strategies(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    fn apply(doc: &Document, strategy: &Strategy) -> Option<String> {
        let long_enough = |text: &String| text.chars().count() > strategy.min_chars;
        match strategy.pick {
            Pick::First => doc
                .select_first(strategy.selector)
                .map(|el| inner_text(el.as_node()))
                .filter(long_enough),
            Pick::Longest => {
                let mut best: Option<(usize, String)> = None;
                for el in doc.select(strategy.selector) {
                    let text = inner_text(el.as_node());
                    if !long_enough(&text) {
                        continue;
                    }
                    let len = text.chars().count();
                    if best.as_ref().map(|(b, _)| len > *b).unwrap_or(true) {
                        best = Some((len, text));
                    }
                }
                best.map(|(_, text)| text)
            }
        }
    }

    fn fallback(doc: &Document) -> String {
        match doc.body() {
            Some(body) => inner_text(&body),
            None => inner_text(doc.root()),
        }
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractorTrait for ContentExtractor {
    fn extract(&self, doc: &Document) -> PageContent {
        let content = self
            .strategies
            .iter()
            .find_map(|s| Self::apply(doc, s))
            .unwrap_or_else(|| Self::fallback(doc));
        PageContent {
            url: doc.url.clone(),
            title: doc.title(),
            content,
        }
    }

    fn extract_chat(&self, doc: &Document, limit: usize) -> Vec<ChatMessage> {
        let selector = format!("[{}]", CHAT_META_ATTR);
        let messages: Vec<ChatMessage> = doc
            .select(&selector)
            .into_iter()
            .filter_map(|el| {
                let text = inner_text(el.as_node());
                if text.is_empty() {
                    return None;
                }
                Some(ChatMessage {
                    meta: attr(&el, CHAT_META_ATTR).unwrap_or_default(),
                    text,
                })
            })
            .collect();
        let skip = messages.len().saturating_sub(limit);
        messages.into_iter().skip(skip).collect()
    }
}

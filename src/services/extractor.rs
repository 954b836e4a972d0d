//! Unsubscribe link extraction.
//!
//! Walks the anchors of an HTML body in document order and returns the
//! `href` of the first anchor whose serialized form (tag, attributes and
//! inner text together) matches any of the keyword patterns. Later logic
//! assumes each sender has at most one candidate link, so this first-match
//! tie-break is load-bearing: no ranking by link text or position.

use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};

/// Keywords that mark an anchor as a candidate unsubscribe link, in
/// priority order.
pub const DEFAULT_KEYWORDS: &[&str] = &["unsubscribe", "subscription", "optout"];

/// Extracts candidate unsubscribe links from HTML message bodies.
pub struct LinkExtractor {
    patterns: Vec<Regex>,
}

impl LinkExtractor {
    /// Creates an extractor with [`DEFAULT_KEYWORDS`].
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_KEYWORDS)
    }

    /// Creates an extractor matching the given keywords, case-insensitively.
    pub fn with_keywords(keywords: &[&str]) -> Self {
        let patterns = keywords
            .iter()
            .filter_map(|keyword| {
                RegexBuilder::new(&regex::escape(keyword))
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .collect();
        Self { patterns }
    }

    /// Returns the first candidate link in `body_html`, if any.
    ///
    /// Anchors are visited in document order; for each anchor the patterns
    /// are tried in priority order. An anchor that matches a keyword but
    /// carries no `href` does not stop the walk. Unparseable input yields
    /// `None`, never an error.
    pub fn extract(&self, body_html: &str) -> Option<String> {
        let document = Html::parse_fragment(body_html);
        let Ok(anchor_selector) = Selector::parse("a") else {
            return None;
        };

        for anchor in document.select(&anchor_selector) {
            let serialized = anchor.html();
            if self.patterns.iter().any(|p| p.is_match(&serialized)) {
                if let Some(href) = anchor.value().attr("href") {
                    return Some(href.to_string());
                }
            }
        }
        None
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

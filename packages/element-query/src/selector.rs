//! Selector Parser
//!
//! Splits a selector list on its top-level commas and pulls the embedded
//! `:media(...)` conditions out of every sub-selector.

use crate::query::{parse_condition, RuleSet};
use once_cell::sync::Lazy;
use regex::Regex;

static QUERY_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":media\s*\(").unwrap());

/// One entry of a parsed sub-selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    Text(String),
    Query(RuleSet),
}

/// A single comma-delimited sub-selector, as alternating literal text and
/// conditions in source order: `[text, query, text, query, ..., text?]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedSelector {
    pub parts: Vec<SelectorPart>,
}

impl ParsedSelector {
    /// True when at least one condition has a usable clause.
    pub fn has_queries(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, SelectorPart::Query(rules) if !rules.is_empty()))
    }

    /// True when any `:media(...)` token was found, usable or not.
    pub fn has_query_tokens(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, SelectorPart::Query(_)))
    }

    pub fn query_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, SelectorPart::Query(_)))
            .count()
    }
}

/// Parse a full selector list. Returns `None` when no sub-selector carries a
/// usable condition; otherwise only the sub-selectors that carry a
/// `:media(...)` token. A token without a usable clause becomes an empty rule
/// set there.
pub fn parse_selector_list(selector: &str) -> Option<Vec<ParsedSelector>> {
    let pieces = parse_rule_selector(selector)?;
    Some(
        pieces
            .into_iter()
            .map(|(_, parsed)| parsed)
            .filter(ParsedSelector::has_query_tokens)
            .collect(),
    )
}

/// Parse every sub-selector of a rule, keeping the source text of each so
/// sub-selectors without a token can be emitted verbatim. `None` when the rule
/// has nothing to rewrite.
pub fn parse_rule_selector(selector: &str) -> Option<Vec<(&str, ParsedSelector)>> {
    let pieces: Vec<_> = split_on_top_level_commas(selector)
        .into_iter()
        .map(|piece| (piece, parse_single_selector(piece)))
        .collect();

    if pieces.iter().any(|(_, parsed)| parsed.has_queries()) {
        Some(pieces)
    } else {
        None
    }
}

/// Split on commas that are not nested inside parentheses.
pub fn split_on_top_level_commas(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut parens = 0usize;
    let mut prev = 0;

    for (i, ch) in text.char_indices() {
        match ch {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            ',' if parens == 0 => {
                result.push(&text[prev..i]);
                prev = i + 1;
            }
            _ => {}
        }
    }

    result.push(&text[prev..]);
    result
}

/// Parse one sub-selector. The result always starts with a text entry, which
/// may be empty when the selector opens with a condition. A condition with no
/// usable clause still becomes a query part, with an empty rule set.
pub fn parse_single_selector(selector: &str) -> ParsedSelector {
    let mut parts = Vec::new();
    // Start of the text chunk that has not been emitted yet.
    let mut chunk_start = 0;
    let mut cursor = 0;

    while let Some(m) = QUERY_START_RE.find_at(selector, cursor) {
        let Some(close) = find_closing_paren(selector, m.end()) else {
            break;
        };

        let rules = parse_condition(&selector[m.end()..close]);
        cursor = close + 1;

        parts.push(SelectorPart::Text(selector[chunk_start..m.start()].to_string()));
        parts.push(SelectorPart::Query(rules));
        chunk_start = cursor;
    }

    let remaining = &selector[chunk_start..];
    if parts.is_empty() || !remaining.trim().is_empty() {
        parts.push(SelectorPart::Text(remaining.to_string()));
    }

    ParsedSelector { parts }
}

// `open` is the index just past the opening paren.
fn find_closing_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

//! Block Scanner
//!
//! A cursor-driven pass over stylesheet text that reports rule and at-rule
//! boundaries to a [`ScanVisitor`]. Nested blocks are handled without a
//! recursive descent: every ordinary rule consumes its own closing brace, so
//! the next bare `}` always belongs to the innermost open nested block.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());

// $1 leading whitespace
// $2 the end of a block ("}")
// $3 a block-less at-rule ("@import ...;")
// $4 the header of a rule or at-rule with a block, excluding the "{"
static STATEMENT_END_OR_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s*)(?:(\})|(@[\w-]+[^;{}]*;)|([^{}]+)\{)").unwrap()
});

/// Receives the pieces of a stylesheet as the scanner finds them. Every hook
/// defaults to doing nothing.
pub trait ScanVisitor {
    /// A nested-block at-rule such as `@media screen ` opened its block.
    fn at_rule_block_start(&mut self, _header: &str) {}

    /// The innermost open nested block was closed.
    fn block_end(&mut self) {}

    /// An ordinary style rule. `body` is everything between the braces.
    fn rule(&mut self, _selector: &str, _body: &str) {}

    /// Whitespace between statements, and trailing whitespace.
    fn whitespace(&mut self, _text: &str) {}

    /// A block-less at-rule, including its terminating `;`.
    fn statement(&mut self, _text: &str) {}

    /// An unsupported at-rule with a block (`@font-face`, `@keyframes`, ...)
    /// that was not scanned. `body` is everything between its braces.
    fn skipped_block(&mut self, _header: &str, _body: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// At-rule keywords whose blocks contain further rules to scan.
    pub nested_block_at_rules: Vec<String>,
    /// Emit unsupported at-rule blocks unchanged instead of dropping them.
    pub keep_skipped_blocks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            nested_block_at_rules: vec!["@media".to_string()],
            keep_skipped_blocks: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    TopLevel,
    InBlock { depth: usize },
}

/// What was left over once scanning stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Nested blocks opened but never closed.
    pub unclosed_blocks: usize,
    /// False when a truncated tail was dropped.
    pub complete: bool,
}

pub fn strip_comments(text: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(text, "")
}

/// Strip comments from `text` and scan it with the default options.
pub fn scan<V: ScanVisitor>(text: &str, visitor: &mut V) -> ScanOutcome {
    scan_with_options(text, &ScanOptions::default(), visitor)
}

pub fn scan_with_options<V: ScanVisitor>(
    text: &str,
    options: &ScanOptions,
    visitor: &mut V,
) -> ScanOutcome {
    let text = strip_comments(text);
    BlockScanner::new(&text, options).run(visitor)
}

pub struct BlockScanner<'a> {
    text: &'a str,
    options: &'a ScanOptions,
    cursor: usize,
    state: ScanState,
}

impl<'a> BlockScanner<'a> {
    /// `text` must already be free of comments.
    pub fn new(text: &'a str, options: &'a ScanOptions) -> Self {
        BlockScanner {
            text,
            options,
            cursor: 0,
            state: ScanState::TopLevel,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn run<V: ScanVisitor>(mut self, visitor: &mut V) -> ScanOutcome {
        let text = self.text;
        let mut complete = true;

        while let Some(caps) = STATEMENT_END_OR_START_RE.captures_at(text, self.cursor) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            if let Some(ws) = caps.get(1).filter(|m| !m.is_empty()) {
                visitor.whitespace(ws.as_str());
            }

            if caps.get(2).is_some() {
                self.close_block(visitor);
                self.cursor = whole.end();
            } else if let Some(statement) = caps.get(3) {
                visitor.statement(statement.as_str());
                self.cursor = whole.end();
            } else if let Some(header) = caps.get(4) {
                let header = header.as_str();
                let body_start = whole.end();

                if self.is_nested_block_header(header) {
                    visitor.at_rule_block_start(header);
                    self.state = match self.state {
                        ScanState::TopLevel => ScanState::InBlock { depth: 1 },
                        ScanState::InBlock { depth } => ScanState::InBlock { depth: depth + 1 },
                    };
                    self.cursor = body_start;
                } else if header.starts_with('@') {
                    let Some(close) = find_matching_close(text, body_start) else {
                        complete = false;
                        break;
                    };
                    log::debug!(target: "element_query", "skipping unsupported at-rule block '{}'", header.trim());
                    visitor.skipped_block(header, &text[body_start..close]);
                    self.cursor = close + 1;
                } else {
                    let Some(close) = text[body_start..].find('}').map(|i| body_start + i) else {
                        complete = false;
                        break;
                    };
                    visitor.rule(header, &text[body_start..close]);
                    self.cursor = close + 1;
                }
            }
        }

        let rest = &text[self.cursor..];
        if !rest.is_empty() {
            if rest.trim().is_empty() {
                visitor.whitespace(rest);
            } else {
                complete = false;
            }
        }
        if !complete {
            log::debug!(target: "element_query", "dropping truncated stylesheet tail at offset {}", self.cursor);
        }

        ScanOutcome {
            unclosed_blocks: match self.state {
                ScanState::TopLevel => 0,
                ScanState::InBlock { depth } => depth,
            },
            complete,
        }
    }

    fn close_block<V: ScanVisitor>(&mut self, visitor: &mut V) {
        match self.state {
            ScanState::TopLevel => {
                log::debug!(target: "element_query", "ignoring stray '}}' at offset {}", self.cursor);
            }
            ScanState::InBlock { depth } => {
                visitor.block_end();
                self.state = if depth == 1 {
                    ScanState::TopLevel
                } else {
                    ScanState::InBlock { depth: depth - 1 }
                };
            }
        }
    }

    fn is_nested_block_header(&self, header: &str) -> bool {
        self.options.nested_block_at_rules.iter().any(|keyword| {
            header.len() >= keyword.len()
                && header.is_char_boundary(keyword.len())
                && header[..keyword.len()].eq_ignore_ascii_case(keyword)
                && !header[keyword.len()..]
                    .starts_with(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
    }
}

// Index of the `}` balancing the block whose body starts at `body_start`.
fn find_matching_close(text: &str, body_start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, ch) in text[body_start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(body_start + i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_strip_comments_non_greedily() {
        assert_eq!(strip_comments("a/* x */{}/* y */b{}"), "a{}b{}");
    }

    #[test]
    fn should_match_nested_keyword_at_word_boundary() {
        let options = ScanOptions::default();
        let scanner = BlockScanner::new("", &options);
        assert!(scanner.is_nested_block_header("@media screen "));
        assert!(scanner.is_nested_block_header("@media(min-width: 1px)"));
        assert!(scanner.is_nested_block_header("@MEDIA print"));
        assert!(!scanner.is_nested_block_header("@media-foo "));
        assert!(!scanner.is_nested_block_header("@font-face "));
    }

    #[test]
    fn should_balance_nested_braces_when_finding_close() {
        let text = "{ a { b } c }tail";
        assert_eq!(find_matching_close(text, 1), Some(12));
    }

    #[test]
    fn should_start_at_top_level() {
        let options = ScanOptions::default();
        assert_eq!(BlockScanner::new("a{}", &options).state(), ScanState::TopLevel);
    }
}

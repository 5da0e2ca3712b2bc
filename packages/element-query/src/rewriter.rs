//! Stylesheet Rewriter
//!
//! Turns a stylesheet containing element queries into plain CSS. Each
//! `:media(...)` in a selector is replaced by a marker class and recorded as a
//! [`QueryDescriptor`]; rule bodies and nested `@media` blocks pass through.
//! Other at-rule blocks are dropped unless
//! [`ScanOptions::keep_skipped_blocks`] is set.

use crate::query::{class_name_for_rules, css_class_token};
use crate::registry::{QueryDescriptor, Registry};
use crate::scanner::{scan_with_options, ScanOptions, ScanVisitor};
use crate::selector::{parse_rule_selector, SelectorPart};

/// Result of rewriting a single stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewriteResult {
    pub queries: Vec<QueryDescriptor>,
    pub css: String,
}

/// Rewrite one stylesheet with a fresh registry.
pub fn rewrite(style_text: &str) -> RewriteResult {
    let mut registry = Registry::new();
    let css = rewrite_into(style_text, &mut registry);
    RewriteResult {
        queries: registry.into_vec(),
        css,
    }
}

/// Rewrite one stylesheet, appending its descriptors to `registry`.
pub fn rewrite_into(style_text: &str, registry: &mut Registry) -> String {
    rewrite_with_options(style_text, &ScanOptions::default(), registry)
}

pub fn rewrite_with_options(
    style_text: &str,
    options: &ScanOptions,
    registry: &mut Registry,
) -> String {
    let mut rewriter = StyleRewriter {
        css: String::with_capacity(style_text.len()),
        registry,
        keep_skipped_blocks: options.keep_skipped_blocks,
    };
    let outcome = scan_with_options(style_text, options, &mut rewriter);

    if outcome.unclosed_blocks > 0 {
        log::warn!(target: "element_query", "closing {} unterminated block(s) in rewritten stylesheet", outcome.unclosed_blocks);
        for _ in 0..outcome.unclosed_blocks {
            rewriter.css.push('}');
        }
    }
    rewriter.css
}

struct StyleRewriter<'r> {
    css: String,
    registry: &'r mut Registry,
    keep_skipped_blocks: bool,
}

impl StyleRewriter<'_> {
    fn push_rule(&mut self, selector: &str, body: &str) {
        self.css.push_str(selector);
        self.css.push('{');
        self.css.push_str(body);
        self.css.push('}');
    }
}

impl ScanVisitor for StyleRewriter<'_> {
    fn at_rule_block_start(&mut self, header: &str) {
        self.css.push_str(header);
        self.css.push('{');
    }

    fn block_end(&mut self) {
        self.css.push('}');
    }

    fn rule(&mut self, selector: &str, body: &str) {
        let Some(pieces) = parse_rule_selector(selector) else {
            self.push_rule(selector, body);
            return;
        };

        let mut new_selector = String::with_capacity(selector.len() + 32);
        for (i, (piece, parsed)) in pieces.into_iter().enumerate() {
            if i > 0 {
                new_selector.push(',');
            }
            // Sub-selectors without a condition stay as they were. Empty
            // conditions are still replaced, by the always-matching `query`.
            if !parsed.has_query_tokens() {
                new_selector.push_str(piece);
                continue;
            }

            // Conditions are replaced by classes as we go, so a later
            // condition's selector includes the classes of earlier ones.
            let mut selector_so_far = String::new();
            for part in parsed.parts {
                match part {
                    SelectorPart::Text(text) => selector_so_far.push_str(&text),
                    SelectorPart::Query(rules) => {
                        let class_name = class_name_for_rules(&rules);
                        let target = selector_so_far.trim();
                        self.registry.push(QueryDescriptor {
                            selector: if target.is_empty() {
                                "*".to_string()
                            } else {
                                target.to_string()
                            },
                            rules,
                            class_name: class_name.clone(),
                        });
                        selector_so_far.push('.');
                        selector_so_far.push_str(&css_class_token(&class_name));
                    }
                }
            }
            new_selector.push_str(&selector_so_far);
        }

        self.css.push_str(new_selector.trim_end());
        self.css.push_str(" {");
        self.css.push_str(body);
        self.css.push('}');
    }

    fn whitespace(&mut self, text: &str) {
        self.css.push_str(text);
    }

    fn statement(&mut self, text: &str) {
        self.css.push_str(text);
    }

    fn skipped_block(&mut self, header: &str, body: &str) {
        if !self.keep_skipped_blocks {
            return;
        }
        if body.contains(":media") {
            log::warn!(target: "element_query", "'{}' is kept unscanned; element queries inside it stay as written", header.trim());
        }
        self.push_rule(header, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_universal_selector_for_bare_condition() {
        let result = rewrite(":media(min-available-width: 10px) { a: b; }");
        assert_eq!(result.queries[0].selector, "*");
        assert_eq!(result.css, ".query_min-available-width_10px { a: b; }");
    }

    #[test]
    fn should_append_to_existing_registry() {
        let mut registry = Registry::new();
        rewrite_into("a:media(min-available-width: 1px) {}", &mut registry);
        rewrite_into("b:media(min-available-width: 1px) {}", &mut registry);
        let selectors: Vec<_> = registry.iter().map(|q| q.selector.as_str()).collect();
        assert_eq!(selectors, vec!["a", "b"]);
        assert_eq!(registry.as_slice()[0].class_name, registry.as_slice()[1].class_name);
    }

    #[test]
    fn should_replace_unusable_condition_once_rule_is_rewritten() {
        let result = rewrite("a:media(min-available-width: 1px):media(zoom: 2furlongs) { x: y; }");
        assert_eq!(result.css, "a.query_min-available-width_1px.query { x: y; }");
        assert!(result.queries[1].rules.is_empty());
        assert_eq!(result.queries[1].class_name, "query");
    }

    #[test]
    fn should_keep_skipped_blocks_when_asked() {
        let options = ScanOptions {
            keep_skipped_blocks: true,
            ..ScanOptions::default()
        };
        let mut registry = Registry::new();
        let css = rewrite_with_options(
            "@keyframes spin { to { rotate: 1turn; } } a:media(min-available-width: 1px) { x: y; }",
            &options,
            &mut registry,
        );
        assert_eq!(
            css,
            "@keyframes spin { to { rotate: 1turn; } } a.query_min-available-width_1px { x: y; }"
        );
    }

    #[test]
    fn should_close_unterminated_nested_blocks() {
        let result = rewrite("@media print { a:media(max-available-width: 1px) { x: y; }");
        assert_eq!(
            result.css,
            "@media print { a.query_max-available-width_1px { x: y; }}"
        );
    }
}

//! Condition Evaluator
//!
//! Decides whether an element currently satisfies a rule set and keeps each
//! descriptor's marker class in sync with that answer.

use crate::host::{DocumentQuery, MetricsProvider};
use crate::matchers::MatcherTable;
use crate::query::Rule;
use crate::registry::Registry;

/// Test whether `element` satisfies every rule. Rules for properties that
/// have no matcher are ignored.
pub fn matches<E>(
    element: &E,
    rules: &[Rule],
    matchers: &MatcherTable<E>,
    metrics: &dyn MetricsProvider<E>,
) -> bool {
    rules.iter().rev().all(|rule| match matchers.get(&rule.property) {
        Some(matcher) => matcher.matches(element, rule.value, rule.units, metrics),
        None => true,
    })
}

/// How many marker classes an evaluation pass added and removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub matched: usize,
    pub unmatched: usize,
}

/// Re-evaluate every descriptor against the elements under `scope` (the whole
/// document for `None`). Running it again without layout changes leaves the
/// class state untouched.
pub fn evaluate_all<E, D>(
    registry: &Registry,
    document: &mut D,
    metrics: &dyn MetricsProvider<E>,
    matchers: &MatcherTable<E>,
    scope: Option<&E>,
) -> EvaluationSummary
where
    D: DocumentQuery<E> + ?Sized,
{
    let mut summary = EvaluationSummary::default();
    for query in registry {
        let elements = document.query_selector_all(scope, &query.selector);
        for element in &elements {
            if matches(element, &query.rules, matchers, metrics) {
                document.add_marker_class(element, &query.class_name);
                summary.matched += 1;
            } else {
                document.remove_marker_class(element, &query.class_name);
                summary.unmatched += 1;
            }
        }
    }
    log::debug!(
        target: "element_query",
        "evaluated {} queries: {} matched, {} unmatched",
        registry.len(),
        summary.matched,
        summary.unmatched
    );
    summary
}

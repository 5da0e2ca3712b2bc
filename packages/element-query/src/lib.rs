#![deny(clippy::all)]

//! Element Queries
//!
//! Style rules gated on measurements of the element itself rather than the
//! viewport. A selector such as `div:media(min-available-width: 300px)` is
//! rewritten into `div.query_min-available-width_300px`, and the marker class
//! is toggled on matching elements whenever the host asks for re-evaluation.

// Parsing
pub mod query;
pub mod scanner;
pub mod selector;

// Rewriting
pub mod registry;
pub mod rewriter;

// Evaluation
pub mod evaluator;
pub mod matchers;
pub mod units;

// Host integration
pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod logging;
pub mod session;

pub use config::Config;
pub use error::{ConfigError, FetchError};
pub use evaluator::{evaluate_all, matches};
pub use host::{DocumentQuery, MetricsProvider, StyleApplier, StyleSheetFetcher};
pub use loader::{load_style_sheets, LoadReport, StyleSheetSource};
pub use matchers::{MatcherTable, QueryMatcher};
pub use query::{class_name_for_rules, parse_condition, Rule, RuleSet, Units};
pub use registry::{QueryDescriptor, Registry};
pub use rewriter::{rewrite, rewrite_into, RewriteResult};
pub use selector::{parse_selector_list, ParsedSelector, SelectorPart};
pub use session::{init, on_initial_load, ElementQueries, HostContext};
pub use units::to_pixels;

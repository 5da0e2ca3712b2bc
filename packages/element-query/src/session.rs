//! Element Query Session
//!
//! Owns the registry and matcher table for one document and exposes the entry
//! points a host wires to its own events: initial load, layout changes and
//! subtree refreshes.

use crate::config::Config;
use crate::error::FetchError;
use crate::evaluator::{evaluate_all, EvaluationSummary};
use crate::host::{DocumentQuery, MetricsProvider, StyleApplier, StyleSheetFetcher};
use crate::loader::{load_style_sheets, LoadReport, StyleSheetSource};
use crate::logging::{FacadeLogger, Logger};
use crate::matchers::MatcherTable;
use crate::registry::Registry;
use crate::rewriter::rewrite_with_options;
use crate::scanner::ScanOptions;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct ElementQueries<E> {
    config: Config,
    scan_options: ScanOptions,
    registry: Registry,
    matchers: MatcherTable<E>,
    logger: Box<dyn Logger>,
}

impl<E> ElementQueries<E> {
    pub fn new(config: Config) -> Self {
        ElementQueries {
            scan_options: config.scan_options(),
            config,
            registry: Registry::new(),
            matchers: MatcherTable::with_builtins(),
            logger: Box::new(FacadeLogger),
        }
    }

    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn matchers(&self) -> &MatcherTable<E> {
        &self.matchers
    }

    /// Register custom matchers here.
    pub fn matchers_mut(&mut self) -> &mut MatcherTable<E> {
        &mut self.matchers
    }

    /// Rewrite a stylesheet and keep its descriptors.
    pub fn rewrite(&mut self, style_text: &str) -> String {
        rewrite_with_options(style_text, &self.scan_options, &mut self.registry)
    }

    /// Process the text of the inline sheet at `sheet_index`. The source text
    /// stays in place; the rewritten rules are appended to it. Returns the
    /// number of descriptors it added.
    pub fn load_inline(
        &mut self,
        sheet_index: usize,
        style_text: &str,
        applier: &mut dyn StyleApplier,
    ) -> usize {
        let before = self.registry.len();
        let css = self.rewrite(style_text);
        applier.append_inline(sheet_index, &css);
        self.registry.len() - before
    }

    /// Process the result of fetching the external sheet at `href`. Failures
    /// are logged and handed back; nothing is applied for them.
    pub fn complete_fetch(
        &mut self,
        href: &str,
        result: Result<String, FetchError>,
        applier: &mut dyn StyleApplier,
    ) -> Result<usize, FetchError> {
        match result {
            Ok(style_text) => {
                let before = self.registry.len();
                let css = self.rewrite(&style_text);
                applier.insert_style(href, &css);
                Ok(self.registry.len() - before)
            }
            Err(err) => {
                self.logger.warn(&err.to_string());
                Err(err)
            }
        }
    }

    /// Re-evaluate all descriptors under `scope`; the whole document for
    /// `None`.
    pub fn evaluate<D>(
        &self,
        document: &mut D,
        metrics: &dyn MetricsProvider<E>,
        scope: Option<&E>,
    ) -> EvaluationSummary
    where
        D: DocumentQuery<E> + ?Sized,
    {
        evaluate_all(&self.registry, document, metrics, &self.matchers, scope)
    }

    /// Call after a resize or any other layout change. Pass the root of a
    /// freshly inserted fragment as `scope` to refresh only that subtree.
    pub fn on_layout_changed<D>(
        &self,
        document: &mut D,
        metrics: &dyn MetricsProvider<E>,
        scope: Option<&E>,
    ) -> EvaluationSummary
    where
        D: DocumentQuery<E> + ?Sized,
    {
        self.evaluate(document, metrics, scope)
    }
}

impl<E> Default for ElementQueries<E> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Everything [`init`] needs from the host.
pub struct HostContext<E> {
    pub fetcher: Box<dyn StyleSheetFetcher>,
    pub applier: Rc<RefCell<dyn StyleApplier>>,
    pub document: Rc<RefCell<dyn DocumentQuery<E>>>,
    pub metrics: Rc<dyn MetricsProvider<E>>,
}

/// Load `sheets` and evaluate. Queries found so far are evaluated right away,
/// so inline sheets apply without waiting for slow fetches; everything is
/// evaluated again once the last sheet completes.
pub fn init<E: 'static>(
    session: &Rc<RefCell<ElementQueries<E>>>,
    sheets: Vec<StyleSheetSource>,
    host: &mut HostContext<E>,
) {
    let evaluated = Rc::new(Cell::new(false));

    let on_done = {
        let session = Rc::clone(session);
        let document = Rc::clone(&host.document);
        let metrics = Rc::clone(&host.metrics);
        let evaluated = Rc::clone(&evaluated);
        move |report: LoadReport| {
            evaluated.set(true);
            let session = session.borrow();
            session.logger.info(&format!(
                "loaded {} stylesheet(s), {} failed, {} element queries",
                report.loaded, report.failed, report.queries
            ));
            session.evaluate(&mut *document.borrow_mut(), &*metrics, None);
        }
    };

    load_style_sheets(
        session,
        sheets,
        host.fetcher.as_mut(),
        Rc::clone(&host.applier),
        on_done,
    );

    // Still waiting on some fetches: evaluate what we have for minimum latency.
    if !evaluated.get() {
        session
            .borrow()
            .evaluate(&mut *host.document.borrow_mut(), &*host.metrics, None);
    }
}

/// Run [`init`] when `autoInit` is on. Returns whether it ran.
pub fn on_initial_load<E: 'static>(
    session: &Rc<RefCell<ElementQueries<E>>>,
    sheets: Vec<StyleSheetSource>,
    host: &mut HostContext<E>,
) -> bool {
    if !session.borrow().config.auto_init {
        return false;
    }
    init(session, sheets, host);
    true
}

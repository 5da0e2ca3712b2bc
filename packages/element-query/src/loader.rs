//! Stylesheet Loader
//!
//! Feeds a document's stylesheets through the rewriter. Inline sheets are
//! processed on the spot; external ones go through the host's fetcher and are
//! processed inside its completion callback. Once every sheet has completed,
//! successfully or not, the caller's `on_all_done` runs exactly once.

use crate::host::{StyleApplier, StyleSheetFetcher};
use crate::session::ElementQueries;
use std::cell::RefCell;
use std::rc::Rc;

/// Where a stylesheet's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSheetSource {
    /// Text of a `<style>` element.
    Inline(String),
    /// `href` of a linked stylesheet.
    External(String),
}

/// Totals handed to `on_all_done`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub failed: usize,
    /// Descriptors added by this batch.
    pub queries: usize,
}

type DoneCallback = Box<dyn FnOnce(LoadReport)>;

/// Counts completions for one batch of stylesheets.
pub struct LoadTracker {
    total: usize,
    report: LoadReport,
    on_done: Option<DoneCallback>,
}

impl LoadTracker {
    pub fn new(total: usize, on_done: impl FnOnce(LoadReport) + 'static) -> Self {
        LoadTracker {
            total,
            report: LoadReport::default(),
            on_done: Some(Box::new(on_done)),
        }
    }

    pub fn completed(&self) -> usize {
        self.report.loaded + self.report.failed
    }

    pub fn is_done(&self) -> bool {
        self.completed() >= self.total
    }

    /// Record one finished sheet. Returns the callback once the batch is
    /// complete; the caller runs it after releasing any borrows.
    fn record(&mut self, queries: Option<usize>) -> Option<(DoneCallback, LoadReport)> {
        match queries {
            Some(count) => {
                self.report.loaded += 1;
                self.report.queries += count;
            }
            None => self.report.failed += 1,
        }
        self.take_if_done()
    }

    fn take_if_done(&mut self) -> Option<(DoneCallback, LoadReport)> {
        if self.is_done() {
            self.on_done.take().map(|done| (done, self.report))
        } else {
            None
        }
    }
}

fn complete(tracker: &Rc<RefCell<LoadTracker>>, queries: Option<usize>) {
    let finished = tracker.borrow_mut().record(queries);
    if let Some((on_done, report)) = finished {
        on_done(report);
    }
}

/// Load every sheet in `sheets` into `session`.
pub fn load_style_sheets<E: 'static>(
    session: &Rc<RefCell<ElementQueries<E>>>,
    sheets: Vec<StyleSheetSource>,
    fetcher: &mut dyn StyleSheetFetcher,
    applier: Rc<RefCell<dyn StyleApplier>>,
    on_all_done: impl FnOnce(LoadReport) + 'static,
) {
    let tracker = Rc::new(RefCell::new(LoadTracker::new(sheets.len(), on_all_done)));

    // Nothing to wait for.
    if sheets.is_empty() {
        let finished = tracker.borrow_mut().take_if_done();
        if let Some((on_done, report)) = finished {
            on_done(report);
        }
        return;
    }

    for (index, sheet) in sheets.into_iter().enumerate() {
        match sheet {
            StyleSheetSource::Inline(text) => {
                let count = session
                    .borrow_mut()
                    .load_inline(index, &text, &mut *applier.borrow_mut());
                complete(&tracker, Some(count));
            }
            StyleSheetSource::External(href) => {
                let session = Rc::clone(session);
                let applier = Rc::clone(&applier);
                let tracker = Rc::clone(&tracker);
                let requested = href.clone();
                fetcher.fetch_text(
                    &requested,
                    Box::new(move |result| {
                        let outcome = session.borrow_mut().complete_fetch(
                            &href,
                            result,
                            &mut *applier.borrow_mut(),
                        );
                        complete(&tracker, outcome.ok());
                    }),
                );
            }
        }
    }
}

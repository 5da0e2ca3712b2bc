// Session Log
//
// Where the session reports what a host should hear about: stylesheets that
// failed to load and the summary of a finished batch. The rewriter and
// evaluator log straight through the `log` facade instead.

/// Receives session messages. Install one with
/// [`crate::session::ElementQueries::with_logger`].
pub trait Logger {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
}

/// Default sink: the `log` facade, target `element_query`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLogger;

impl Logger for FacadeLogger {
    fn info(&self, msg: &str) {
        log::info!(target: "element_query", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: "element_query", "{}", msg);
    }
}

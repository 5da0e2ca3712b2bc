//! Host Collaborators
//!
//! Everything that needs a live document lives behind these traits: layout
//! measurement, selector matching, class toggling, fetching and applying
//! stylesheets. `E` is the host's element handle; it should be cheap to clone.

use crate::error::FetchError;

/// Layout measurements. All values are CSS pixels and are expected to be
/// finite and non-negative.
pub trait MetricsProvider<E> {
    /// Computed font size of `element`, or of the root element for `None`.
    fn resolved_font_size_px(&self, element: Option<&E>) -> f64;

    fn viewport_width_px(&self) -> f64;

    fn viewport_height_px(&self) -> f64;

    /// The element whose box an element's available space is measured from,
    /// usually its parent. `None` for the root.
    fn containing_block(&self, element: &E) -> Option<E>;

    fn offset_width_px(&self, element: &E) -> f64;

    fn offset_height_px(&self, element: &E) -> f64;

    /// Width available to `element`.
    fn available_width_px(&self, element: &E) -> Option<f64> {
        self.containing_block(element)
            .map(|block| self.offset_width_px(&block))
    }

    /// Height available to `element`.
    fn available_height_px(&self, element: &E) -> Option<f64> {
        self.containing_block(element)
            .map(|block| self.offset_height_px(&block))
    }
}

/// Selector matching and marker-class toggling.
pub trait DocumentQuery<E> {
    /// Elements under `scope` (the whole document for `None`) that match
    /// `selector`, in document order.
    fn query_selector_all(&self, scope: Option<&E>, selector: &str) -> Vec<E>;

    fn add_marker_class(&mut self, element: &E, class_name: &str);

    fn remove_marker_class(&mut self, element: &E, class_name: &str);
}

/// Completion callback handed to [`StyleSheetFetcher::fetch_text`]. It must be
/// called exactly once.
pub type FetchCallback = Box<dyn FnOnce(Result<String, FetchError>)>;

/// Fetches the text of external stylesheets. Implementations may call
/// `on_done` synchronously or later from the host's event loop.
pub trait StyleSheetFetcher {
    fn fetch_text(&mut self, href: &str, on_done: FetchCallback);
}

/// Makes rewritten CSS take effect.
pub trait StyleApplier {
    /// Rewritten text for an inline `<style>` sheet; appended after its
    /// current contents, which stay in effect.
    fn append_inline(&mut self, sheet_index: usize, css: &str);

    /// Rewritten text for an external sheet; inserted as a new style element.
    fn insert_style(&mut self, href: &str, css: &str);
}

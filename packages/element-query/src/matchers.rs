//! Query Matchers
//!
//! One matcher per queryable property. The built-in ones compare the space an
//! element's containing block gives it against the clause value; hosts can
//! register more under their own property names.

use crate::host::MetricsProvider;
use crate::query::Units;
use crate::units::to_pixels;
use indexmap::IndexMap;

/// Decides one clause, e.g. `min-available-width: 300px`, for an element.
pub trait QueryMatcher<E> {
    fn matches(
        &self,
        element: &E,
        value: f64,
        units: Units,
        metrics: &dyn MetricsProvider<E>,
    ) -> bool;
}

impl<E, F> QueryMatcher<E> for F
where
    F: Fn(&E, f64, Units, &dyn MetricsProvider<E>) -> bool,
{
    fn matches(
        &self,
        element: &E,
        value: f64,
        units: Units,
        metrics: &dyn MetricsProvider<E>,
    ) -> bool {
        self(element, value, units, metrics)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Measured size must be at least the target.
    Min,
    /// Measured size must be at most the target.
    Max,
}

/// `min-available-width` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableSpaceMatcher {
    pub axis: Axis,
    pub bound: Bound,
}

impl AvailableSpaceMatcher {
    pub const fn new(axis: Axis, bound: Bound) -> Self {
        AvailableSpaceMatcher { axis, bound }
    }
}

impl<E> QueryMatcher<E> for AvailableSpaceMatcher {
    fn matches(
        &self,
        element: &E,
        value: f64,
        units: Units,
        metrics: &dyn MetricsProvider<E>,
    ) -> bool {
        // A zero target never matches.
        if value == 0.0 {
            return false;
        }

        let measured = match self.axis {
            Axis::Width => metrics.available_width_px(element),
            Axis::Height => metrics.available_height_px(element),
        };
        let Some(measured) = measured else {
            return false;
        };

        let reference = metrics.containing_block(element);
        let target = to_pixels(value, units, reference.as_ref(), metrics);
        match self.bound {
            Bound::Min => measured >= target,
            Bound::Max => measured <= target,
        }
    }
}

pub const MAX_AVAILABLE_WIDTH: &str = "max-available-width";
pub const MIN_AVAILABLE_WIDTH: &str = "min-available-width";
pub const MAX_AVAILABLE_HEIGHT: &str = "max-available-height";
pub const MIN_AVAILABLE_HEIGHT: &str = "min-available-height";

/// Property name to matcher. Properties nobody registered are treated as
/// always satisfied, so stylesheets written for richer hosts still apply.
pub struct MatcherTable<E> {
    matchers: IndexMap<String, Box<dyn QueryMatcher<E>>>,
}

impl<E> MatcherTable<E> {
    /// A table with no matchers at all.
    pub fn empty() -> Self {
        MatcherTable {
            matchers: IndexMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut table = Self::empty();
        table.register(
            MAX_AVAILABLE_WIDTH,
            AvailableSpaceMatcher::new(Axis::Width, Bound::Max),
        );
        table.register(
            MIN_AVAILABLE_WIDTH,
            AvailableSpaceMatcher::new(Axis::Width, Bound::Min),
        );
        table.register(
            MAX_AVAILABLE_HEIGHT,
            AvailableSpaceMatcher::new(Axis::Height, Bound::Max),
        );
        table.register(
            MIN_AVAILABLE_HEIGHT,
            AvailableSpaceMatcher::new(Axis::Height, Bound::Min),
        );
        table
    }

    /// Add or replace the matcher for `property`.
    pub fn register<M>(&mut self, property: impl Into<String>, matcher: M)
    where
        M: QueryMatcher<E> + 'static,
    {
        self.matchers.insert(property.into(), Box::new(matcher));
    }

    pub fn get(&self, property: &str) -> Option<&dyn QueryMatcher<E>> {
        self.matchers.get(property).map(|matcher| matcher.as_ref())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.matchers.contains_key(property)
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.matchers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl<E> Default for MatcherTable<E> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

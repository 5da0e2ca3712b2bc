//! Query Registry
//!
//! Every embedded condition found while rewriting becomes a
//! [`QueryDescriptor`]. Descriptors accumulate, in load order, for as long as
//! the owner keeps the registry around.

use crate::query::RuleSet;
use serde::{Deserialize, Serialize};

/// Binds the selector an element must match, the clauses it must satisfy and
/// the marker class that is toggled on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    pub selector: String,
    pub rules: RuleSet,
    pub class_name: String,
}

/// Append-only list of descriptors. Identical conditions in unrelated rules
/// are not merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    queries: Vec<QueryDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: QueryDescriptor) {
        self.queries.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryDescriptor> {
        self.queries.iter()
    }

    pub fn as_slice(&self) -> &[QueryDescriptor] {
        &self.queries
    }

    pub fn into_vec(self) -> Vec<QueryDescriptor> {
        self.queries
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a QueryDescriptor;
    type IntoIter = std::slice::Iter<'a, QueryDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

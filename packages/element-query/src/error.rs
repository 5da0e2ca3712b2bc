//! Errors
//!
//! Stylesheet parsing never fails; malformed input degrades to partial
//! output. These cover what the host hands back to us.

use std::path::PathBuf;
use thiserror::Error;

/// An external stylesheet could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not load stylesheet at {href}: {reason}")]
pub struct FetchError {
    pub href: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(href: impl Into<String>, reason: impl Into<String>) -> Self {
        FetchError {
            href: href.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

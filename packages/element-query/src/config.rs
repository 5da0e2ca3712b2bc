//! Configuration
//!
//! Read from JSON, e.g.
//!
//! ```json
//! { "autoInit": true, "nestedBlockAtRules": ["@media", "@supports"], "keepSkippedBlocks": true }
//! ```

use crate::error::{ConfigError, Result};
use crate::scanner::ScanOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Evaluate queries as part of [`crate::session::on_initial_load`].
    pub auto_init: bool,
    /// At-rules whose blocks hold further style rules.
    pub nested_block_at_rules: Vec<String>,
    /// Keep other at-rule blocks in rewritten output. Unset leaves it to the
    /// caller: the session drops them, `eqc` keeps them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_skipped_blocks: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            auto_init: true,
            nested_block_at_rules: ScanOptions::default().nested_block_at_rules,
            keep_skipped_blocks: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            nested_block_at_rules: self.nested_block_at_rules.clone(),
            keep_skipped_blocks: self.keep_skipped_blocks.unwrap_or(false),
        }
    }
}

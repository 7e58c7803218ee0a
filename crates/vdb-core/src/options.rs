//! Configuration options for grid decoding.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scanner::DEFAULT_MAX_TOKEN_ATTEMPTS;

/// Upper bound on metadata entries decoded from one grid.
pub const MAX_METADATA_ENTRIES: usize = 32;

/// Options controlling a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum bytes a single token scan may consume.
    pub max_token_attempts: usize,

    /// Maximum metadata entries to decode. Values above
    /// [`MAX_METADATA_ENTRIES`] are clamped.
    pub max_metadata_entries: usize,

    /// Whether reaching the entry bound with bytes still pending is an error
    /// rather than a warning.
    pub strict_metadata_limit: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_token_attempts: DEFAULT_MAX_TOKEN_ATTEMPTS,
            max_metadata_entries: MAX_METADATA_ENTRIES,
            strict_metadata_limit: false,
        }
    }
}

impl ParseOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the entry bound actually applied.
    pub fn metadata_limit(&self) -> usize {
        self.max_metadata_entries.min(MAX_METADATA_ENTRIES)
    }
}

//! Report publishing configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FALLBACK_DIR, DEFAULT_PUBLISH_BATCH_SIZE, DEFAULT_RESULTS_TABLE, DEFAULT_RUNS_TABLE,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PublishConfig {
    /// Publish to the remote service. Default: true.
    pub enabled: Option<bool>,
    /// Result rows per insert request. Default: 50.
    pub batch_size: Option<usize>,
    /// Default: `audit_runs`.
    pub runs_table: Option<String>,
    /// Default: `audit_results`.
    pub results_table: Option<String>,
    /// Where the fallback artifact goes when publishing fails.
    pub fallback_dir: Option<PathBuf>,
}

impl PublishConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_PUBLISH_BATCH_SIZE)
    }

    pub fn effective_runs_table(&self) -> &str {
        self.runs_table.as_deref().unwrap_or(DEFAULT_RUNS_TABLE)
    }

    pub fn effective_results_table(&self) -> &str {
        self.results_table.as_deref().unwrap_or(DEFAULT_RESULTS_TABLE)
    }

    pub fn effective_fallback_dir(&self) -> PathBuf {
        self.fallback_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FALLBACK_DIR))
    }
}

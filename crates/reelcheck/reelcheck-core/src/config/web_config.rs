//! Public website probe configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebConfig {
    /// Public site root, e.g. `https://reel.example.com`.
    pub site_url: Option<String>,
    /// Optional bearer token sent with probes.
    pub token: Option<String>,
    /// Probe timeout in seconds. Default: 30.
    pub timeout_secs: Option<u64>,
}

impl WebConfig {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Site URL without a trailing slash.
    pub fn site_root(&self) -> Option<&str> {
        self.site_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }
}

//! Remote data service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REST_PATH, DEFAULT_TIMEOUT_SECS};

/// Connection settings for the tabular data service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL, e.g. `https://project.example.co`.
    pub base_url: Option<String>,
    /// REST path prefix. Default: `/rest/v1`.
    pub rest_path: Option<String>,
    /// Privileged service credential.
    pub service_key: Option<String>,
    /// Restricted anonymous credential.
    pub anon_key: Option<String>,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    pub fn effective_rest_path(&self) -> &str {
        self.rest_path.as_deref().unwrap_or(DEFAULT_REST_PATH)
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// True once a base URL and the service credential are present.
    pub fn is_configured(&self) -> bool {
        self.base_url.as_deref().is_some_and(|u| !u.is_empty())
            && self.service_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

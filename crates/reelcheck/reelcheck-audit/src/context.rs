//! Everything a check may read: the two remote-facing clients, the local
//! source trees, and resolved configuration.

use reelcheck_core::config::ReelcheckConfig;
use reelcheck_core::model::{CoverageBands, NoDataPolicy, Outcome, PrerequisitePolicy};
use reelcheck_sources::{DataSource, SourceTree, WebProbe};

/// Read-only inputs shared by every check in a run.
#[derive(Clone, Copy)]
pub struct AuditContext<'a> {
    pub remote: &'a dyn DataSource,
    pub web: &'a dyn WebProbe,
    /// Web/app source tree, when a source root is configured and exists.
    pub source: Option<&'a SourceTree>,
    /// iOS project tree.
    pub ios: Option<&'a SourceTree>,
    pub config: &'a ReelcheckConfig,
}

impl<'a> AuditContext<'a> {
    pub fn prerequisite_policy(&self) -> PrerequisitePolicy {
        self.config.governance.effective_prerequisite_policy()
    }

    pub fn no_data_policy(&self) -> NoDataPolicy {
        self.config.governance.effective_no_data_policy()
    }

    pub fn coverage_bands(&self) -> CoverageBands {
        self.config.governance.coverage_bands()
    }

    /// Prerequisite-missing outcome under the configured policy.
    pub fn missing(&self, reason: impl Into<String>) -> Outcome {
        Outcome::prerequisite_missing(reason, self.prerequisite_policy())
    }

    /// Verified-no-data outcome under the configured policy.
    pub fn no_data(&self, what: impl Into<String>) -> Outcome {
        Outcome::verified_no_data(what, self.no_data_policy())
    }

    /// Absolute URL for a site path, if a site URL is configured.
    pub fn site_url(&self, path: &str) -> Option<String> {
        let root = self.config.web.site_root()?;
        Some(format!("{root}/{}", path.trim_start_matches('/')))
    }

    /// The source tree, or the prerequisite-missing outcome to return instead.
    pub fn source_tree(&self) -> Result<&'a SourceTree, Outcome> {
        self.source
            .ok_or_else(|| self.missing("source root not configured"))
    }

    pub fn ios_tree(&self) -> Result<&'a SourceTree, Outcome> {
        self.ios
            .ok_or_else(|| self.missing("iOS project root not configured"))
    }
}

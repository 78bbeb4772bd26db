//! Governance thresholds and outcome policies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COVERAGE_PASS_PCT, DEFAULT_COVERAGE_WARN_PCT, DEFAULT_SKIP_THRESHOLD,
    DEFAULT_SPOT_CHECK_RATIO,
};
use crate::model::outcome::CoverageBands;
use crate::model::{NoDataPolicy, PrerequisitePolicy, Section};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Skip-rate ceiling for sections without an override. Default: 0.30.
    pub default_skip_threshold: Option<f64>,
    /// Per-section skip-rate ceilings keyed by section name.
    #[serde(default)]
    pub skip_thresholds: BTreeMap<String, f64>,
    /// Default: skip.
    pub prerequisite_policy: Option<PrerequisitePolicy>,
    /// Default: pass.
    pub no_data_policy: Option<NoDataPolicy>,
    /// Default: 95.0.
    pub coverage_pass_pct: Option<f64>,
    /// Default: 80.0.
    pub coverage_warn_pct: Option<f64>,
    /// Share of reference items that must satisfy a spot check. Default: 0.70.
    pub spot_check_ratio: Option<f64>,
}

impl GovernanceConfig {
    /// Effective skip-rate ceiling for `section`: explicit override, then
    /// built-in tighter ceilings, then the default.
    pub fn skip_threshold(&self, section: Section) -> f64 {
        if let Some(v) = self.skip_thresholds.get(section.as_str()) {
            return *v;
        }
        match section {
            Section::Security => 0.10,
            Section::DataIntegrity => 0.15,
            _ => self.default_skip_threshold.unwrap_or(DEFAULT_SKIP_THRESHOLD),
        }
    }

    pub fn effective_prerequisite_policy(&self) -> PrerequisitePolicy {
        self.prerequisite_policy.unwrap_or_default()
    }

    pub fn effective_no_data_policy(&self) -> NoDataPolicy {
        self.no_data_policy.unwrap_or_default()
    }

    pub fn coverage_bands(&self) -> CoverageBands {
        CoverageBands {
            pass_pct: self.coverage_pass_pct.unwrap_or(DEFAULT_COVERAGE_PASS_PCT),
            warn_pct: self.coverage_warn_pct.unwrap_or(DEFAULT_COVERAGE_WARN_PCT),
        }
    }

    pub fn effective_spot_check_ratio(&self) -> f64 {
        self.spot_check_ratio.unwrap_or(DEFAULT_SPOT_CHECK_RATIO)
    }
}

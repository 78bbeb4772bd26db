//! Outcome constructors: the only way checks produce a status.

use serde::{Deserialize, Serialize};

use super::result::CheckStatus;

/// What an unreachable prerequisite (table, file, endpoint) turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrerequisitePolicy {
    #[default]
    Skip,
    Fail,
}

/// What "infrastructure works but zero instances observed" turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoDataPolicy {
    #[default]
    Pass,
    Skip,
}

/// Percentage bands for graded coverage checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageBands {
    /// At or above: pass.
    pub pass_pct: f64,
    /// At or above (and below `pass_pct`): warn. Below: fail.
    pub warn_pct: f64,
}

impl Default for CoverageBands {
    fn default() -> Self {
        Self {
            pass_pct: crate::constants::DEFAULT_COVERAGE_PASS_PCT,
            warn_pct: crate::constants::DEFAULT_COVERAGE_WARN_PCT,
        }
    }
}

impl CoverageBands {
    pub fn status_for(&self, pct: f64) -> CheckStatus {
        if pct >= self.pass_pct {
            CheckStatus::Pass
        } else if pct >= self.warn_pct {
            CheckStatus::Warn
        } else {
            CheckStatus::Fail
        }
    }
}

/// The evaluated result of a check, before it is bound to a check id.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: CheckStatus,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub detail: Option<String>,
}

impl Outcome {
    fn new(status: CheckStatus) -> Self {
        Self {
            status,
            expected: None,
            actual: None,
            detail: None,
        }
    }

    pub fn pass() -> Self {
        Self::new(CheckStatus::Pass)
    }

    /// A failed condition. Always carries the expected/actual pair.
    pub fn fail(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail)
            .expected(expected)
            .actual(actual)
    }

    pub fn warn(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn)
            .expected(expected)
            .actual(actual)
    }

    /// Could not be evaluated. The reason is mandatory.
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::new(CheckStatus::Skip).detail(reason)
    }

    /// The data source, file or endpoint the check depends on is unreachable.
    pub fn prerequisite_missing(reason: impl Into<String>, policy: PrerequisitePolicy) -> Self {
        let reason = reason.into();
        match policy {
            PrerequisitePolicy::Skip => Self::skip(format!("prerequisite missing: {reason}")),
            PrerequisitePolicy::Fail => Self::fail("prerequisite available", "prerequisite missing")
                .detail(reason),
        }
    }

    /// Infrastructure verified but nothing to evaluate yet (e.g. pre-launch).
    pub fn verified_no_data(what: impl Into<String>, policy: NoDataPolicy) -> Self {
        let what = what.into();
        match policy {
            NoDataPolicy::Pass => Self::pass()
                .actual("0 instances")
                .detail(format!("infrastructure verified, no data yet: {what}")),
            NoDataPolicy::Skip => Self::skip(format!("no data yet: {what}")),
        }
    }

    /// Grade a percentage against coverage bands.
    pub fn graded(pct: f64, bands: &CoverageBands) -> Self {
        let expected = format!(">= {:.1}%", bands.pass_pct);
        let actual = format!("{pct:.1}%");
        match bands.status_for(pct) {
            CheckStatus::Pass => Self::pass().expected(expected).actual(actual),
            CheckStatus::Warn => Self::warn(expected, actual)
                .detail(format!("between {:.1}% and {:.1}%", bands.warn_pct, bands.pass_pct)),
            _ => Self::fail(expected, actual)
                .detail(format!("below the {:.1}% warning floor", bands.warn_pct)),
        }
    }

    /// Pass or fail on a boolean with a shared expected/actual rendering.
    pub fn check(condition: bool, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        if condition {
            Self::pass().expected(expected).actual(actual)
        } else {
            Self::fail(expected, actual)
        }
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

//! The canonical check result record.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::outcome::Outcome;
use super::section::Section;

/// Reporting weight of a check. Does not influence pass/fail logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final status of a check. Each check transitions to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Skip,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed check. Created once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_id: String,
    pub section: Section,
    pub name: String,
    pub severity: Severity,
    pub status: CheckStatus,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub detail: Option<String>,
    pub source_ref: Option<String>,
    /// Reserved; per-check timing is not measured.
    pub duration_ms: u64,
}

impl CheckResult {
    /// Build a result from a check's identity and its evaluated outcome.
    pub fn from_outcome(
        check_id: impl Into<String>,
        section: Section,
        name: impl Into<String>,
        severity: Severity,
        source_ref: Option<&str>,
        outcome: Outcome,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            section,
            name: name.into(),
            severity,
            status: outcome.status,
            expected: outcome.expected,
            actual: outcome.actual,
            detail: outcome.detail,
            source_ref: source_ref.map(str::to_string),
            duration_ms: 0,
        }
    }

    /// A skip result for a declared id that no check touched.
    pub fn unfilled(check_id: impl Into<String>, section: Section, reason: &str) -> Self {
        Self::from_outcome(
            check_id,
            section,
            "Not yet automated",
            Severity::Low,
            None,
            Outcome::skip(reason),
        )
    }

    /// True for the only outcome that gates the process exit code.
    pub fn is_critical_failure(&self) -> bool {
        self.status == CheckStatus::Fail && self.severity == Severity::Critical
    }
}

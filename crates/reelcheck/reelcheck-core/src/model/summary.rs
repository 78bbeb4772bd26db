//! Run-level and section-level statistics derived from results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::{CheckResult, CheckStatus};

/// Status counts over a set of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub skipped: usize,
    pub critical_failures: usize,
}

impl SectionStats {
    /// Single pass over `results`.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        let mut stats = Self::default();
        for result in results {
            stats.add(result);
        }
        stats
    }

    pub fn add(&mut self, result: &CheckResult) {
        self.total += 1;
        match result.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Fail => self.failed += 1,
            CheckStatus::Warn => self.warnings += 1,
            CheckStatus::Skip => self.skipped += 1,
        }
        if result.is_critical_failure() {
            self.critical_failures += 1;
        }
    }

    /// `passed / (passed + failed) * 100`; warn and skip are excluded.
    /// Zero when nothing passed or failed.
    pub fn score_pct(&self) -> f64 {
        let decided = self.passed + self.failed;
        if decided == 0 {
            0.0
        } else {
            self.passed as f64 / decided as f64 * 100.0
        }
    }

    /// `skipped / total`, zero for an empty set.
    pub fn skip_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.skipped as f64 / self.total as f64
        }
    }
}

/// One per invocation. Derived after all sections finish; never stored
/// separately from the results it summarizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub skipped: usize,
    pub score_pct: f64,
    pub critical_failures: usize,
    pub trigger_type: String,
    pub summary_notes: Option<String>,
}

impl RunSummary {
    pub fn from_results(
        results: &[CheckResult],
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        trigger_type: impl Into<String>,
        summary_notes: Option<String>,
    ) -> Self {
        let stats = SectionStats::from_results(results);
        let duration_ms = (completed_at - started_at).num_milliseconds().max(0) as u64;
        Self {
            started_at,
            completed_at,
            duration_ms,
            total_checks: stats.total,
            passed: stats.passed,
            failed: stats.failed,
            warnings: stats.warnings,
            skipped: stats.skipped,
            score_pct: stats.score_pct(),
            critical_failures: stats.critical_failures,
            trigger_type: trigger_type.into(),
            summary_notes,
        }
    }

    /// Process exit code: non-zero iff at least one critical check failed.
    pub fn exit_code(&self) -> i32 {
        if self.critical_failures > 0 {
            1
        } else {
            0
        }
    }
}

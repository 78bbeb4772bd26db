//! Console reporter: human-readable output with color codes.

use std::fmt::Write as _;

use reelcheck_core::model::{CheckResult, CheckStatus, Severity};

use super::Reporter;
use crate::aggregate::SectionCompliance;
use crate::controller::AuditReport;

/// Console reporter for human-readable terminal output.
pub struct ConsoleReporter {
    pub use_color: bool,
    /// Also list passing checks.
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            verbose: false,
        }
    }

    fn status_symbol(&self, status: CheckStatus) -> &'static str {
        match status {
            CheckStatus::Pass => "✓",
            CheckStatus::Fail => "✗",
            CheckStatus::Warn => "⚠",
            CheckStatus::Skip => "⊘",
        }
    }

    fn color_start(&self, status: CheckStatus, severity: Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match (status, severity) {
            (CheckStatus::Fail, Severity::Critical) => "\x1b[1;31m", // bold red
            (CheckStatus::Fail, _) => "\x1b[31m",                    // red
            (CheckStatus::Warn, _) => "\x1b[33m",                    // yellow
            (CheckStatus::Skip, _) => "\x1b[90m",                    // gray
            (CheckStatus::Pass, _) => "\x1b[32m",                    // green
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }

    fn result_line(&self, out: &mut String, r: &CheckResult) {
        let _ = writeln!(
            out,
            "  {}{} {:<4}{} [{}] {}",
            self.color_start(r.status, r.severity),
            self.status_symbol(r.status),
            r.check_id,
            self.color_end(),
            r.severity,
            r.name,
        );
        if r.status == CheckStatus::Pass && !self.verbose {
            return;
        }
        if r.expected.is_some() || r.actual.is_some() {
            let _ = writeln!(
                out,
                "      expected: {}  actual: {}",
                r.expected.as_deref().unwrap_or("-"),
                r.actual.as_deref().unwrap_or("-"),
            );
        }
        if let Some(ref detail) = r.detail {
            let _ = writeln!(out, "      {detail}");
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, report: &AuditReport) -> Result<String, String> {
        let mut output = String::new();

        output.push_str("╔══════════════════════════════════════════╗\n");
        output.push_str("║          Reelcheck Audit Report          ║\n");
        output.push_str("╚══════════════════════════════════════════╝\n\n");

        for row in &report.compliance {
            let _ = writeln!(
                output,
                "{} ({}/{} passed)",
                row.section, row.stats.passed, row.stats.total
            );
            for result in report.section_results(row.section) {
                if self.verbose || result.status != CheckStatus::Pass {
                    self.result_line(&mut output, result);
                }
            }
            output.push('\n');
        }

        let s = &report.summary;
        let _ = writeln!(
            output,
            "─── Summary: {} checks, {} passed, {} failed, {} warnings, {} skipped ───",
            s.total_checks, s.passed, s.failed, s.warnings, s.skipped
        );
        let _ = writeln!(
            output,
            "Score: {:.1}%  Critical failures: {}  Duration: {} ms  Trigger: {}",
            s.score_pct, s.critical_failures, s.duration_ms, s.trigger_type
        );
        if let Some(ref notes) = s.summary_notes {
            let _ = writeln!(output, "Notes: {notes}");
        }
        output.push('\n');

        output.push_str(&compliance_table(&report.compliance));

        if !report.rejected.is_empty() {
            let _ = writeln!(output, "\nRejected results: {}", report.rejected.len());
            for r in &report.rejected {
                let _ = writeln!(output, "  {r}");
            }
        }

        if report.exit_code() == 0 {
            output.push_str("\nResult: PASSED ✓\n");
        } else {
            output.push_str("\nResult: FAILED ✗ (critical failures)\n");
        }

        Ok(output)
    }
}

/// Fixed-width skip-rate compliance table.
pub fn compliance_table(rows: &[SectionCompliance]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:>7} {:>9} {:>10}  {}",
        "section", "skipped", "skip rate", "threshold", "status"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<18} {:>3}/{:<3} {:>8.1}% {:>9.1}%  {}",
            row.section.as_str(),
            row.stats.skipped,
            row.stats.total,
            row.skip_rate * 100.0,
            row.threshold * 100.0,
            if row.compliant { "ok" } else { "OVER" }
        );
    }
    out
}

//! Run controller: sections in fixed order, one collector for the run,
//! derived summary and compliance table.

use chrono::Utc;
use reelcheck_core::errors::ReelErrorCode;
use reelcheck_core::model::{CheckResult, RunSummary, Section, SectionStats};
use reelcheck_core::recorder::ResultCollector;
use serde::Serialize;

use crate::aggregate::{self, SectionCompliance};
use crate::context::AuditContext;
use crate::runner;
use crate::sections::{self, SectionDef};

/// Everything one invocation produced.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub summary: RunSummary,
    pub results: Vec<CheckResult>,
    pub compliance: Vec<SectionCompliance>,
    /// Results the collector refused, as coded error strings.
    pub rejected: Vec<String>,
}

impl AuditReport {
    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }

    /// Results of one section, in ordinal order.
    pub fn section_results(&self, section: Section) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.section == section)
    }
}

/// Runs a fixed, ordered set of sections.
#[derive(Debug)]
pub struct AuditController {
    sections: Vec<SectionDef>,
}

impl AuditController {
    /// All ten sections.
    pub fn new() -> Self {
        Self::with_sections(sections::all_sections())
    }

    /// Custom section tables. Execution order is still the fixed section
    /// order regardless of the order given.
    pub fn with_sections(mut sections: Vec<SectionDef>) -> Self {
        sections.sort_by_key(|def| def.section);
        sections.dedup_by_key(|def| def.section);
        Self { sections }
    }

    /// Keep only `selected`. An empty selection keeps everything.
    pub fn filtered(mut self, selected: &[Section]) -> Self {
        if !selected.is_empty() {
            self.sections.retain(|def| selected.contains(&def.section));
        }
        self
    }

    pub fn sections(&self) -> Vec<Section> {
        self.sections.iter().map(|def| def.section).collect()
    }

    pub fn run(&self, ctx: &AuditContext<'_>) -> AuditReport {
        self.run_with_progress(ctx, |_, _| {})
    }

    /// Run every section; `progress` is called after each one finishes.
    pub fn run_with_progress(
        &self,
        ctx: &AuditContext<'_>,
        mut progress: impl FnMut(Section, &SectionStats),
    ) -> AuditReport {
        let started_at = Utc::now();
        let mut collector = ResultCollector::new();
        let mut rejected = Vec::new();

        for def in &self.sections {
            let results = runner::run_section(def, ctx);
            let stats = SectionStats::from_results(&results);
            tracing::info!(
                section = %def.section,
                passed = stats.passed,
                total = stats.total,
                failed = stats.failed,
                skipped = stats.skipped,
                "section finished"
            );
            progress(def.section, &stats);
            rejected.extend(collector.absorb(results).iter().map(|e| e.coded_string()));
        }

        let completed_at = Utc::now();
        let results = collector.into_results();
        let compliance =
            aggregate::compliance_table(&results, &self.sections(), &ctx.config.governance);
        let notes = aggregate::breach_notes(&compliance);
        let summary = RunSummary::from_results(
            &results,
            started_at,
            completed_at,
            ctx.config.run.effective_trigger_type(),
            notes,
        );

        tracing::info!(
            total = summary.total_checks,
            score_pct = summary.score_pct,
            critical_failures = summary.critical_failures,
            "audit finished"
        );

        AuditReport {
            summary,
            results,
            compliance,
            rejected,
        }
    }
}

impl Default for AuditController {
    fn default() -> Self {
        Self::new()
    }
}

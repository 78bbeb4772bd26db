//! Aggregation, compliance table and reporter output.

use chrono::Utc;
use proptest::prelude::*;
use reelcheck_audit::aggregate::{breach_notes, compliance_table, section_stats};
use reelcheck_audit::reporters::{available_formats, create_reporter};
use reelcheck_audit::AuditReport;
use reelcheck_core::config::GovernanceConfig;
use reelcheck_core::model::{CheckResult, Outcome, RunSummary, Section, Severity};

fn result(section: Section, ordinal: u32, severity: Severity, outcome: Outcome) -> CheckResult {
    CheckResult::from_outcome(
        section.check_id(ordinal),
        section,
        format!("check {ordinal}"),
        severity,
        None,
        outcome,
    )
}

/// 7 pass, 3 fail (one critical), 2 warn, 8 skip, spread over two sections.
fn mixed() -> Vec<CheckResult> {
    let mut out = Vec::new();
    let mut n = 0;
    let mut push = |section: Section, severity: Severity, outcome: Outcome| {
        n += 1;
        out.push(result(section, n, severity, outcome));
    };
    for _ in 0..7 {
        push(Section::Website, Severity::Medium, Outcome::pass());
    }
    push(Section::Website, Severity::Critical, Outcome::fail("200", "500"));
    push(Section::Website, Severity::High, Outcome::fail("a", "b"));
    push(Section::Website, Severity::Low, Outcome::fail("a", "b"));
    for _ in 0..2 {
        push(Section::Security, Severity::Medium, Outcome::warn("a", "b"));
    }
    for _ in 0..8 {
        push(Section::Security, Severity::Medium, Outcome::skip("offline"));
    }
    out
}

fn report(results: Vec<CheckResult>) -> AuditReport {
    let governance = GovernanceConfig::default();
    let compliance =
        compliance_table(&results, &[Section::Website, Section::Security], &governance);
    let now = Utc::now();
    let summary = RunSummary::from_results(&results, now, now, "manual", breach_notes(&compliance));
    AuditReport {
        summary,
        results,
        compliance,
        rejected: Vec::new(),
    }
}

#[test]
fn score_and_counts() {
    let r = report(mixed());
    assert_eq!(r.summary.total_checks, 20);
    assert_eq!(r.summary.score_pct, 70.0);
    assert_eq!(r.summary.critical_failures, 1);
    assert_eq!(r.exit_code(), 1);
}

#[test]
fn per_section_stats_and_thresholds() {
    let results = mixed();
    let stats = section_stats(&results);
    assert_eq!(stats[&Section::Website].total, 10);
    assert_eq!(stats[&Section::Security].skipped, 8);

    let rows = compliance_table(&results, &[Section::Website, Section::Security], &GovernanceConfig::default());
    assert!(rows[0].compliant);
    assert_eq!(rows[0].threshold, 0.30);
    assert_eq!(rows[1].skip_rate, 0.8);
    assert!(!rows[1].compliant);
    assert_eq!(
        breach_notes(&rows).as_deref(),
        Some("security skip rate 80% exceeds 10%")
    );
}

#[test]
fn section_without_results_is_compliant() {
    let rows = compliance_table(&[], &[Section::Marketing], &GovernanceConfig::default());
    assert_eq!(rows[0].stats.total, 0);
    assert!(rows[0].compliant);
    assert!(breach_notes(&rows).is_none());
}

#[test]
fn threshold_overrides_apply() {
    let mut governance = GovernanceConfig::default();
    governance.skip_thresholds.insert("security".to_string(), 0.9);
    let rows = compliance_table(&mixed(), &[Section::Security], &governance);
    assert!(rows[0].compliant);
}

#[test]
fn console_report_lists_non_passing_checks_and_the_table() {
    let reporter = create_reporter("console").unwrap();
    assert_eq!(reporter.name(), "console");
    let text = reporter.generate(&report(mixed())).unwrap();

    assert!(text.contains("Reelcheck Audit Report"));
    assert!(text.contains("website (7/10 passed)"));
    assert!(text.contains("W8"));
    assert!(!text.contains("W1 "));
    assert!(text.contains("Score: 70.0%"));
    assert!(text.contains("OVER"));
    assert!(text.contains("Result: FAILED"));
}

#[test]
fn json_report_is_parseable() {
    let reporter = create_reporter("json").unwrap();
    let text = reporter.generate(&report(mixed())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["exit_code"], 1);
    assert_eq!(value["summary"]["passed"], 7);
    assert_eq!(value["results"].as_array().unwrap().len(), 20);
    assert_eq!(value["compliance"][1]["section"], "security");
}

#[test]
fn unknown_format_has_no_reporter() {
    assert!(create_reporter("sarif").is_none());
    assert_eq!(available_formats(), &["console", "json"]);
}

fn outcome_strategy() -> impl Strategy<Value = (Outcome, Severity)> {
    let outcome = prop_oneof![
        Just(Outcome::pass()),
        Just(Outcome::fail("x", "y")),
        Just(Outcome::warn("x", "y")),
        Just(Outcome::skip("z")),
    ];
    let severity = prop_oneof![
        Just(Severity::Critical),
        Just(Severity::High),
        Just(Severity::Medium),
        Just(Severity::Low),
    ];
    (outcome, severity)
}

proptest! {
    #[test]
    fn section_stats_partition_the_run(items in prop::collection::vec(outcome_strategy(), 0..60)) {
        let results: Vec<CheckResult> = items
            .into_iter()
            .enumerate()
            .map(|(i, (o, s))| {
                let section = Section::all()[i % Section::all().len()];
                result(section, i as u32 + 1, s, o)
            })
            .collect();
        let per_section = section_stats(&results);
        let total: usize = per_section.values().map(|s| s.total).sum();
        let critical: usize = per_section.values().map(|s| s.critical_failures).sum();
        prop_assert_eq!(total, results.len());
        prop_assert_eq!(critical, results.iter().filter(|r| r.is_critical_failure()).count());
        for s in per_section.values() {
            prop_assert_eq!(s.total, s.passed + s.failed + s.warnings + s.skipped);
            prop_assert!((0.0..=1.0).contains(&s.skip_rate()));
        }
    }
}

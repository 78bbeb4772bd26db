//! Publisher tests: run record first, batched results, fallback artifact.

mod common;

use chrono::{TimeZone, Utc};
use reelcheck_audit::publish::fallback_file_name;
use reelcheck_audit::Publisher;
use reelcheck_core::config::PublishConfig;
use reelcheck_core::model::{CheckResult, CheckStatus, Outcome, RunSummary, Section, Severity};
use reelcheck_sources::{Method, QueryResult};
use serde_json::Value;

use common::{created, FakeRemote};

fn results(n: u32) -> Vec<CheckResult> {
    (1..=n)
        .map(|i| {
            CheckResult::from_outcome(
                Section::DataIntegrity.check_id(i),
                Section::DataIntegrity,
                format!("check {i}"),
                Severity::Medium,
                None,
                if i % 2 == 0 { Outcome::pass() } else { Outcome::skip("offline") },
            )
        })
        .collect()
}

fn summary(results: &[CheckResult]) -> RunSummary {
    let started = Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap();
    let completed = Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 9).unwrap();
    RunSummary::from_results(results, started, completed, "cron", None)
}

fn config(fallback: &std::path::Path) -> PublishConfig {
    PublishConfig {
        fallback_dir: Some(fallback.to_path_buf()),
        ..PublishConfig::default()
    }
}

#[test]
fn results_are_batched_and_tagged_with_run_id() {
    let dir = tempfile::tempdir().unwrap();
    let remote = FakeRemote::new(|req| match req.method {
        Method::Post if req.path == "audit_runs" => created("run-42"),
        Method::Post => QueryResult {
            status: 201,
            ..QueryResult::default()
        },
        _ => QueryResult {
            status: 200,
            ..QueryResult::default()
        },
    });
    let cfg = config(dir.path());
    let all = results(120);

    let outcome = Publisher::new(&remote, &cfg).publish(&summary(&all), &all);

    assert_eq!(outcome.run_id.as_deref(), Some("run-42"));
    assert_eq!(outcome.batches_attempted, 3);
    assert_eq!(outcome.batches_failed, 0);
    assert_eq!(outcome.results_written, 120);
    assert!(outcome.is_complete());
    assert!(outcome.fallback_path.is_none());

    let calls = remote.calls();
    assert_eq!(calls[0].path, "audit_runs");
    let run_body = calls[0].body.as_ref().unwrap();
    assert_eq!(run_body["total_checks"], 120);
    assert_eq!(run_body["trigger_type"], "cron");

    let batches: Vec<&Vec<Value>> = calls[1..4]
        .iter()
        .map(|c| {
            assert_eq!(c.path, "audit_results");
            c.body.as_ref().unwrap().as_array().unwrap()
        })
        .collect();
    assert_eq!(batches.iter().map(|b| b.len()).collect::<Vec<_>>(), vec![50, 50, 20]);
    assert!(batches.iter().flat_map(|b| b.iter()).all(|row| row["run_id"] == "run-42"));
    assert_eq!(batches[0][0]["check_id"], "D1");
    assert_eq!(batches[0][0]["section"], "data_integrity");

    let patch = &calls[4];
    assert_eq!(patch.method, Method::Patch);
    assert_eq!(patch.path, "audit_runs?id=eq.run-42");
    assert_eq!(patch.body.as_ref().unwrap()["publish_status"], "complete");
}

#[test]
fn batch_failures_are_counted_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let batch = std::cell::Cell::new(0);
    let remote = FakeRemote::new(move |req| match req.method {
        Method::Post if req.path == "audit_runs" => created("run-7"),
        Method::Post => {
            batch.set(batch.get() + 1);
            if batch.get() == 1 {
                QueryResult::http_error(500, "deadlock detected")
            } else {
                QueryResult {
                    status: 201,
                    ..QueryResult::default()
                }
            }
        }
        _ => QueryResult {
            status: 200,
            ..QueryResult::default()
        },
    });
    let cfg = config(dir.path());
    let all = results(60);

    let outcome = Publisher::new(&remote, &cfg).publish(&summary(&all), &all);

    assert_eq!(outcome.batches_attempted, 2);
    assert_eq!(outcome.batches_failed, 1);
    assert_eq!(outcome.results_written, 10);
    assert!(!outcome.is_complete());
    assert!(outcome.errors[0].starts_with("[PUBLISH_FAILED]"));
    let patch = remote.calls().pop().unwrap();
    assert_eq!(patch.body.unwrap()["publish_status"], "partial");
}

#[test]
fn failed_run_record_writes_fallback_and_no_batches() {
    let dir = tempfile::tempdir().unwrap();
    let remote = FakeRemote::new(|_| QueryResult::http_error(503, "service unavailable"));
    let cfg = config(&dir.path().join("fallback"));
    let all = results(53);
    let run = summary(&all);

    let outcome = Publisher::new(&remote, &cfg).publish(&run, &all);

    assert!(outcome.run_id.is_none());
    assert_eq!(outcome.batches_attempted, 0);
    assert_eq!(remote.calls().len(), 1, "only the run insert is attempted");

    let path = outcome.fallback_path.expect("fallback written");
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), fallback_file_name(&run));
    let artifact: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(artifact["run"]["total_checks"], 53);
    let written = artifact["results"].as_array().unwrap();
    assert_eq!(written.len(), 53);
    let skipped = written.iter().filter(|r| r["status"] == "skip").count();
    assert_eq!(skipped, all.iter().filter(|r| r.status == CheckStatus::Skip).count());
    assert!(artifact["reason"].as_str().unwrap().contains("503"));
}

#[test]
fn created_without_id_still_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let remote = FakeRemote::new(|_| QueryResult {
        status: 201,
        ..QueryResult::default()
    });
    let cfg = config(dir.path());
    let all = results(3);

    let outcome = Publisher::new(&remote, &cfg).publish(&summary(&all), &all);
    assert!(outcome.run_id.is_none());
    assert!(outcome.fallback_path.is_some());
    assert_eq!(remote.calls().len(), 1);
}

#[test]
fn unwritable_fallback_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();
    let remote = FakeRemote::new(|_| QueryResult::transport_error("connection refused"));
    let cfg = config(&blocker);
    let all = results(2);

    let outcome = Publisher::new(&remote, &cfg).publish(&summary(&all), &all);
    assert!(outcome.fallback_path.is_none());
    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.errors[1].starts_with("[FALLBACK_FAILED]"));
}

#[test]
fn fallback_name_is_timestamped() {
    let all = results(1);
    assert_eq!(
        fallback_file_name(&summary(&all)),
        "reelcheck-run-20260301T060000.000Z.json"
    );
}

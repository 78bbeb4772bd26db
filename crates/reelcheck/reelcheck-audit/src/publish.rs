//! Persist a finished run: one run record, then results in batches tagged
//! with the run id. When the run record cannot be created, no result rows
//! are written and the whole run goes to a local fallback artifact instead.
//!
//! Publishing is best-effort. Failures are logged and reported in the
//! returned [`PublishOutcome`]; nothing here panics or propagates.

use std::path::{Path, PathBuf};

use reelcheck_core::config::PublishConfig;
use reelcheck_core::errors::{PublishError, ReelErrorCode};
use reelcheck_core::model::{CheckResult, RunSummary};
use reelcheck_sources::{DataSource, QueryRequest, QueryResult};
use serde::Serialize;
use serde_json::{json, Value};

/// What happened while publishing.
#[derive(Debug, Default, Serialize)]
pub struct PublishOutcome {
    /// Id of the created run record.
    pub run_id: Option<String>,
    pub batches_attempted: usize,
    pub batches_failed: usize,
    pub results_written: usize,
    /// Set when the fallback artifact was written.
    pub fallback_path: Option<PathBuf>,
    /// Coded error strings, in occurrence order.
    pub errors: Vec<String>,
}

impl PublishOutcome {
    /// Every result reached the service.
    pub fn is_complete(&self) -> bool {
        self.run_id.is_some() && self.batches_failed == 0
    }

    fn push_error(&mut self, error: PublishError) {
        tracing::warn!(code = error.error_code(), error = %error, "publish error");
        self.errors.push(error.coded_string());
    }
}

/// The fallback artifact: the run and every result.
#[derive(Debug, Serialize)]
struct FallbackArtifact<'a> {
    run: &'a RunSummary,
    results: &'a [CheckResult],
    reason: String,
}

pub struct Publisher<'a> {
    remote: &'a dyn DataSource,
    config: &'a PublishConfig,
}

impl<'a> Publisher<'a> {
    pub fn new(remote: &'a dyn DataSource, config: &'a PublishConfig) -> Self {
        Self { remote, config }
    }

    pub fn publish(&self, summary: &RunSummary, results: &[CheckResult]) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();
        let runs_table = self.config.effective_runs_table();

        let run_key = uuid::Uuid::new_v4().to_string();
        let created = self.remote.insert(runs_table, run_record(&run_key, summary));
        let Some(run_id) = created_id(&created) else {
            outcome.push_error(PublishError::RunNotCreated {
                status: created.status,
                reason: created.describe(),
            });
            let reason = created.describe();
            self.write_fallback(summary, results, reason, &mut outcome);
            return outcome;
        };
        tracing::info!(run_id = %run_id, results = results.len(), "run record created");

        let results_table = self.config.effective_results_table();
        let batch_size = self.config.effective_batch_size().max(1);
        for (batch, chunk) in results.chunks(batch_size).enumerate() {
            outcome.batches_attempted += 1;
            let rows: Vec<Value> = chunk.iter().map(|r| result_row(&run_id, r)).collect();
            let inserted = self.remote.insert(results_table, Value::Array(rows));
            if inserted.created() {
                outcome.results_written += chunk.len();
            } else {
                outcome.batches_failed += 1;
                outcome.push_error(PublishError::BatchFailed {
                    batch,
                    status: inserted.status,
                    reason: inserted.describe(),
                });
            }
        }

        self.mark_published(&run_id, &outcome);
        outcome.run_id = Some(run_id);
        outcome
    }

    /// Record the publish status on the run record. Failure is only logged.
    fn mark_published(&self, run_id: &str, outcome: &PublishOutcome) {
        let status = if outcome.batches_failed == 0 {
            "complete"
        } else {
            "partial"
        };
        let path = format!(
            "{}?id=eq.{}",
            self.config.effective_runs_table(),
            run_id
        );
        let body = json!({
            "publish_status": status,
            "results_written": outcome.results_written,
        });
        let patched = self.remote.query(&QueryRequest::patch(path, body));
        if !patched.is_success() {
            tracing::warn!(run_id, reason = %patched.describe(), "run status not updated");
        }
    }

    fn write_fallback(
        &self,
        summary: &RunSummary,
        results: &[CheckResult],
        reason: String,
        outcome: &mut PublishOutcome,
    ) {
        let dir = self.config.effective_fallback_dir();
        let path = dir.join(fallback_file_name(summary));
        let artifact = FallbackArtifact {
            run: summary,
            results,
            reason,
        };
        match write_json(&dir, &path, &artifact) {
            Ok(()) => {
                tracing::warn!(path = %path.display(), "run written to fallback artifact");
                outcome.fallback_path = Some(path);
            }
            Err(reason) => outcome.push_error(PublishError::FallbackFailed {
                path: path.display().to_string(),
                reason,
            }),
        }
    }
}

/// `reelcheck-run-<timestamp>.json`, timestamped by run start.
pub fn fallback_file_name(summary: &RunSummary) -> String {
    format!(
        "reelcheck-run-{}.json",
        summary.started_at.format("%Y%m%dT%H%M%S%.3fZ")
    )
}

fn write_json(dir: &Path, path: &Path, value: &impl Serialize) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    std::fs::write(path, text).map_err(|e| e.to_string())
}

fn run_record(run_key: &str, summary: &RunSummary) -> Value {
    let mut record = serde_json::to_value(summary).unwrap_or_else(|_| json!({}));
    if let Value::Object(ref mut map) = record {
        map.insert("id".to_string(), Value::String(run_key.to_string()));
    }
    record
}

fn result_row(run_id: &str, result: &CheckResult) -> Value {
    let mut row = serde_json::to_value(result).unwrap_or_else(|_| json!({}));
    if let Value::Object(ref mut map) = row {
        map.insert("run_id".to_string(), Value::String(run_id.to_string()));
    }
    row
}

/// The id of a freshly created row, as a string.
fn created_id(result: &QueryResult) -> Option<String> {
    if !result.created() {
        return None;
    }
    match result.data.first()?.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

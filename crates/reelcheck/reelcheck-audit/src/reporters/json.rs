//! JSON reporter: the full report as structured JSON.

use serde_json::json;

use super::Reporter;
use crate::controller::AuditReport;

/// JSON reporter for machine-readable output.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, report: &AuditReport) -> Result<String, String> {
        let output = json!({
            "version": reelcheck_core::constants::VERSION,
            "exit_code": report.exit_code(),
            "summary": report.summary,
            "compliance": report.compliance,
            "results": report.results,
            "rejected": report.rejected,
        });
        serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
    }
}

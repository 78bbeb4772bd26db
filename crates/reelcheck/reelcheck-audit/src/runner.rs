//! Section runner: evaluates a section's checks in table order, contains
//! panics, records through a [`SectionRecorder`] and applies the fill sweep.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use reelcheck_core::model::{CheckResult, Outcome};
use reelcheck_core::recorder::SectionRecorder;

use crate::context::AuditContext;
use crate::sections::{CheckDef, SectionDef};

/// Run every check of `def` and return exactly `def.declared` results,
/// ordered by ordinal.
pub fn run_section(def: &SectionDef, ctx: &AuditContext<'_>) -> Vec<CheckResult> {
    let mut recorder = SectionRecorder::new(def.section, def.declared);

    for check in def.checks {
        let check_id = def.section.check_id(check.ordinal);
        let outcome = evaluate(check, ctx);
        tracing::debug!(
            check_id = %check_id,
            status = %outcome.status,
            "check evaluated"
        );
        let result = CheckResult::from_outcome(
            check_id,
            def.section,
            check.name,
            check.severity,
            check.source_ref,
            outcome,
        );
        if let Err(e) = recorder.record(result) {
            tracing::warn!(section = %def.section, error = %e, "result rejected");
        }
    }

    recorder.finish()
}

/// Evaluate one check. A panic becomes a `fail` carrying the panic message.
pub fn evaluate(check: &CheckDef, ctx: &AuditContext<'_>) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| (check.run)(ctx))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(check = check.name, panic = %message, "check panicked");
            Outcome::fail("check completes", "panicked").detail(message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

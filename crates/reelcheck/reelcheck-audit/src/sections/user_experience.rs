//! User-facing polish detectable from the source tree.

use reelcheck_core::model::{Outcome, Section, Severity};

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

pub const SECTION: SectionDef = SectionDef {
    section: Section::UserExperience,
    declared: 4,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "No placeholder copy in source",
            severity: Severity::Medium,
            source_ref: None,
            run: no_lorem_ipsum,
        },
        CheckDef {
            ordinal: 2,
            name: "Error boundary in place",
            severity: Severity::Medium,
            source_ref: None,
            run: error_boundary,
        },
        CheckDef {
            ordinal: 3,
            name: "Loading skeletons used",
            severity: Severity::Low,
            source_ref: None,
            run: loading_skeletons,
        },
        CheckDef {
            ordinal: 4,
            name: "Empty state for recommendations",
            severity: Severity::Low,
            source_ref: None,
            run: empty_state,
        },
    ],
};

fn no_lorem_ipsum(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_absent(ctx, ctx.source, r"lorem ipsum", |_| true)
}

fn error_boundary(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_present(ctx, ctx.source, r"ErrorBoundary")
}

fn loading_skeletons(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_present(ctx, ctx.source, r"Skeleton")
}

fn empty_state(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_present(ctx, ctx.source, r"EmptyState|no recommendations yet")
}

//! Legal and store-policy requirements.

use reelcheck_core::model::{Outcome, Section, Severity};

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

pub const SECTION: SectionDef = SectionDef {
    section: Section::Compliance,
    declared: 4,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Privacy policy published",
            severity: Severity::Critical,
            source_ref: Some("/privacy"),
            run: privacy_page,
        },
        CheckDef {
            ordinal: 2,
            name: "Terms of service published",
            severity: Severity::High,
            source_ref: Some("/terms"),
            run: terms_page,
        },
        CheckDef {
            ordinal: 3,
            name: "TMDB attribution shown",
            severity: Severity::High,
            source_ref: Some("TMDB API terms"),
            run: tmdb_attribution,
        },
        CheckDef {
            ordinal: 4,
            name: "In-app account deletion",
            severity: Severity::Critical,
            source_ref: Some("App Store guideline 5.1.1(v)"),
            run: account_deletion,
        },
    ],
};

fn privacy_page(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/privacy", &["privacy"])
}

fn terms_page(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/terms", &["terms"])
}

fn tmdb_attribution(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_present(ctx, ctx.source, r"uses the TMDB API|not endorsed or certified by TMDB")
}

fn account_deletion(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_present(ctx, ctx.source, r"delete[\s_-]?account")
}

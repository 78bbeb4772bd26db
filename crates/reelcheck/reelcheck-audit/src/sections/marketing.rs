//! Share-card metadata and store links on the public site.

use reelcheck_core::model::{Outcome, Section, Severity};

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

pub const SECTION: SectionDef = SectionDef {
    section: Section::Marketing,
    declared: 3,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Open Graph image declared",
            severity: Severity::Medium,
            source_ref: Some("og:image"),
            run: og_image,
        },
        CheckDef {
            ordinal: 2,
            name: "Twitter card declared",
            severity: Severity::Low,
            source_ref: Some("twitter:card"),
            run: twitter_card,
        },
        CheckDef {
            ordinal: 3,
            name: "App Store link on home page",
            severity: Severity::Medium,
            source_ref: None,
            run: app_store_link,
        },
    ],
};

fn og_image(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/", &["og:image"])
}

fn twitter_card(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/", &["twitter:card"])
}

fn app_store_link(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/", &["apps.apple.com"])
}

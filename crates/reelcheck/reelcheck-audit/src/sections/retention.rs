//! Engagement signals. Pre-launch, most of these observe zero rows and fall
//! under the no-data policy.

use reelcheck_core::model::{Outcome, Section, Severity};

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

pub const SECTION: SectionDef = SectionDef {
    section: Section::Retention,
    declared: 3,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Watchlist activity in the last 30 days",
            severity: Severity::Medium,
            source_ref: Some("watchlist.created_at"),
            run: watchlist_activity,
        },
        CheckDef {
            ordinal: 2,
            name: "Onboarding completion rate",
            severity: Severity::Low,
            source_ref: Some("user_profiles.onboarding_completed_at"),
            run: onboarding_completion,
        },
        CheckDef {
            ordinal: 3,
            name: "Post-watch feedback view present",
            severity: Severity::High,
            source_ref: Some("iOS feedback prompt"),
            run: feedback_view,
        },
    ],
};

fn watchlist_activity(ctx: &AuditContext<'_>) -> Outcome {
    shapes::recent_activity(ctx, "watchlist", 30)
}

fn onboarding_completion(ctx: &AuditContext<'_>) -> Outcome {
    shapes::coverage(ctx, "user_profiles", "onboarding_completed_at=is.null")
}

/// A Swift file with "feedback" in its name anywhere in the iOS project.
fn feedback_view(ctx: &AuditContext<'_>) -> Outcome {
    let tree = match ctx.ios_tree() {
        Ok(tree) => tree,
        Err(outcome) => return outcome,
    };
    let found = tree.find_file_where(|name| {
        name.ends_with(".swift") && name.to_ascii_lowercase().contains("feedback")
    });
    match found {
        Some(path) => Outcome::pass()
            .expected("feedback view")
            .actual(tree.relative(&path).display().to_string()),
        None => Outcome::fail("feedback view", "no *Feedback*.swift file"),
    }
}

//! iOS project configuration read from the local checkout.

use regex::RegexBuilder;
use reelcheck_core::model::{Outcome, Section, Severity};

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

const INFO_PLIST: &str = "Info.plist";
const PRIVACY_MANIFEST: &str = "PrivacyInfo.xcprivacy";

pub const SECTION: SectionDef = SectionDef {
    section: Section::IosBuild,
    declared: 5,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Info.plist present",
            severity: Severity::High,
            source_ref: Some(INFO_PLIST),
            run: info_plist_present,
        },
        CheckDef {
            ordinal: 2,
            name: "Marketing version declared",
            severity: Severity::High,
            source_ref: Some("CFBundleShortVersionString"),
            run: version_declared,
        },
        CheckDef {
            ordinal: 3,
            name: "Privacy manifest present",
            severity: Severity::Critical,
            source_ref: Some(PRIVACY_MANIFEST),
            run: privacy_manifest,
        },
        CheckDef {
            ordinal: 4,
            name: "App Transport Security not disabled",
            severity: Severity::High,
            source_ref: Some("NSAllowsArbitraryLoads"),
            run: ats_enabled,
        },
        CheckDef {
            ordinal: 5,
            name: "Checked-out branch",
            severity: Severity::Low,
            source_ref: Some(".git/HEAD"),
            run: git_branch,
        },
    ],
};

fn info_plist_present(ctx: &AuditContext<'_>) -> Outcome {
    shapes::file_present(ctx, ctx.ios, INFO_PLIST)
}

fn version_declared(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_in_file(ctx, ctx.ios, INFO_PLIST, r"CFBundleShortVersionString")
}

fn privacy_manifest(ctx: &AuditContext<'_>) -> Outcome {
    shapes::file_present(ctx, ctx.ios, PRIVACY_MANIFEST)
}

fn ats_enabled(ctx: &AuditContext<'_>) -> Outcome {
    let tree = match ctx.ios_tree() {
        Ok(tree) => tree,
        Err(outcome) => return outcome,
    };
    let Some(path) = tree.find_file(INFO_PLIST) else {
        return ctx.missing(format!("{INFO_PLIST} not found"));
    };
    let Some(text) = tree.read_text(&path) else {
        return ctx.missing(format!("{INFO_PLIST} unreadable"));
    };
    match allows_arbitrary_loads(&text) {
        Ok(disabled) => Outcome::check(
            !disabled,
            "NSAllowsArbitraryLoads absent or false",
            if disabled { "true" } else { "absent or false" },
        ),
        Err(e) => Outcome::skip(e),
    }
}

/// True when the plist sets `NSAllowsArbitraryLoads` to `<true/>`.
pub fn allows_arbitrary_loads(plist: &str) -> Result<bool, String> {
    let re = RegexBuilder::new(r"<key>\s*NSAllowsArbitraryLoads\s*</key>\s*<true\s*/>")
        .case_insensitive(true)
        .build()
        .map_err(|e| e.to_string())?;
    Ok(re.is_match(plist))
}

fn git_branch(ctx: &AuditContext<'_>) -> Outcome {
    let tree = match ctx.ios_tree() {
        Ok(tree) => tree,
        Err(outcome) => return outcome,
    };
    match tree.git_head() {
        Some(head) => Outcome::pass()
            .actual(head)
            .detail("advisory: recorded for provenance"),
        None => Outcome::skip("no git metadata"),
    }
}

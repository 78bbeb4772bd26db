//! Access control on the data service, secret hygiene in the source tree,
//! and transport security on the site.

use std::path::Path;

use reelcheck_core::constants::PROJECT_CONFIG_FILE;
use reelcheck_core::model::{Outcome, Section, Severity};
use serde_json::json;

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

/// Directories whose code runs server-side and may legitimately reference
/// the service credential.
const SERVER_DIRS: &[&str] = &["server", "functions", "scripts", "migrations"];

pub const SECTION: SectionDef = SectionDef {
    section: Section::Security,
    declared: 6,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Anonymous read denied on user_profiles",
            severity: Severity::Critical,
            source_ref: Some("RLS user_profiles"),
            run: profiles_protected,
        },
        CheckDef {
            ordinal: 2,
            name: "Anonymous read denied on user_ratings",
            severity: Severity::Critical,
            source_ref: Some("RLS user_ratings"),
            run: ratings_protected,
        },
        CheckDef {
            ordinal: 3,
            name: "Catalog publicly readable",
            severity: Severity::Medium,
            source_ref: Some("RLS movies"),
            run: catalog_public,
        },
        CheckDef {
            ordinal: 4,
            name: "Anonymous insert denied on user_ratings",
            severity: Severity::Critical,
            source_ref: Some("RLS user_ratings"),
            run: ratings_insert_denied,
        },
        CheckDef {
            ordinal: 5,
            name: "Service credential absent from client code",
            severity: Severity::Critical,
            source_ref: None,
            run: no_service_key_in_client,
        },
        CheckDef {
            ordinal: 6,
            name: "HSTS header served",
            severity: Severity::High,
            source_ref: Some("Strict-Transport-Security"),
            run: hsts_header,
        },
    ],
};

fn profiles_protected(ctx: &AuditContext<'_>) -> Outcome {
    shapes::access_denied(ctx, "user_profiles")
}

fn ratings_protected(ctx: &AuditContext<'_>) -> Outcome {
    shapes::access_denied(ctx, "user_ratings")
}

fn catalog_public(ctx: &AuditContext<'_>) -> Outcome {
    use reelcheck_sources::CredentialTier;

    if !ctx.remote.has_tier(CredentialTier::Anonymous) {
        return ctx.missing("no anonymous credential configured");
    }
    let anon = ctx
        .remote
        .sample_as("movies", "id", 1, CredentialTier::Anonymous);
    if anon.is_transport_error() {
        return ctx.missing(format!("movies (anonymous): {}", anon.describe()));
    }
    if !anon.ok() {
        return Outcome::fail("anonymous read allowed", anon.describe());
    }
    if anon.data.is_empty() {
        return ctx.no_data("movies has no rows visible to any tier");
    }
    Outcome::pass()
        .expected("anonymous read allowed")
        .actual(format!("HTTP {}", anon.status))
}

fn ratings_insert_denied(ctx: &AuditContext<'_>) -> Outcome {
    shapes::insert_denied(
        ctx,
        "user_ratings",
        json!({
            "user_id": "00000000-0000-0000-0000-000000000000",
            "movie_id": 0,
            "rating": 1,
        }),
    )
}

fn no_service_key_in_client(ctx: &AuditContext<'_>) -> Outcome {
    let mut pattern = String::from(r"service_role");
    if let Some(key) = ctx.config.remote.service_key.as_deref().filter(|k| !k.is_empty()) {
        pattern.push('|');
        pattern.push_str(&regex::escape(key));
    }
    shapes::pattern_absent(ctx, ctx.source, &pattern, is_client_path)
}

fn is_client_path(path: &Path) -> bool {
    if path.file_name().is_some_and(|n| n == PROJECT_CONFIG_FILE) {
        return false;
    }
    !path
        .components()
        .any(|c| c.as_os_str().to_str().is_some_and(|s| SERVER_DIRS.contains(&s)))
}

fn hsts_header(ctx: &AuditContext<'_>) -> Outcome {
    shapes::header_present(ctx, "/", "strict-transport-security")
}

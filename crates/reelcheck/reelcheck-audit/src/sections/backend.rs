//! Backend configuration and liveness of the data service.

use std::collections::BTreeSet;

use reelcheck_core::constants::MAX_SAMPLE_ROWS;
use reelcheck_core::model::{Outcome, Section, Severity};
use serde_json::Value;

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

/// Keys the apps read from `app_config` at launch.
pub const REQUIRED_CONFIG_KEYS: &[&str] =
    &["min_app_version", "recommendation_model", "maintenance_mode"];

/// Catalog size below which recommendations degrade.
pub const MIN_CATALOG_SIZE: u64 = 1000;

pub const SECTION: SectionDef = SectionDef {
    section: Section::Backend,
    declared: 5,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Data service reachable",
            severity: Severity::Critical,
            source_ref: None,
            run: service_reachable,
        },
        CheckDef {
            ordinal: 2,
            name: "Required app_config keys present",
            severity: Severity::High,
            source_ref: Some("app_config"),
            run: app_config_keys,
        },
        CheckDef {
            ordinal: 3,
            name: "Recommendations generated in the last 7 days",
            severity: Severity::Medium,
            source_ref: Some("recommendations.created_at"),
            run: recent_recommendations,
        },
        CheckDef {
            ordinal: 4,
            name: "Catalog size",
            severity: Severity::High,
            source_ref: Some("movies"),
            run: catalog_size,
        },
        CheckDef {
            ordinal: 5,
            name: "Ratings within 1-5",
            severity: Severity::Medium,
            source_ref: Some("user_ratings.rating"),
            run: rating_range,
        },
    ],
};

fn service_reachable(ctx: &AuditContext<'_>) -> Outcome {
    if !ctx.config.remote.is_configured() {
        return ctx.missing("remote data service not configured");
    }
    let result = ctx.remote.count("movies", &[]);
    if result.is_transport_error() {
        return Outcome::fail("reachable", result.describe());
    }
    Outcome::check(result.ok(), "HTTP 200", format!("HTTP {}", result.status))
}

fn app_config_keys(ctx: &AuditContext<'_>) -> Outcome {
    let sample = ctx.remote.sample("app_config", "key", MAX_SAMPLE_ROWS);
    if !sample.ok() {
        return ctx.missing(format!("app_config: {}", sample.describe()));
    }
    let present: BTreeSet<&str> = sample
        .data
        .iter()
        .filter_map(|row| row.get("key").and_then(Value::as_str))
        .collect();
    let missing: Vec<&str> = REQUIRED_CONFIG_KEYS
        .iter()
        .copied()
        .filter(|k| !present.contains(k))
        .collect();
    Outcome::check(
        missing.is_empty(),
        REQUIRED_CONFIG_KEYS.join(", "),
        if missing.is_empty() {
            format!("{} keys present", present.len())
        } else {
            format!("missing {}", missing.join(", "))
        },
    )
}

fn recent_recommendations(ctx: &AuditContext<'_>) -> Outcome {
    shapes::recent_activity(ctx, "recommendations", 7)
}

fn catalog_size(ctx: &AuditContext<'_>) -> Outcome {
    let expected = format!(">= {MIN_CATALOG_SIZE} titles");
    match shapes::exact_count(ctx, "movies", &[]) {
        Ok(0) => Outcome::fail(expected, "0 titles"),
        Ok(n) if n < MIN_CATALOG_SIZE => Outcome::warn(expected, format!("{n} titles")),
        Ok(n) => Outcome::pass().expected(expected).actual(format!("{n} titles")),
        Err(outcome) => outcome,
    }
}

fn rating_range(ctx: &AuditContext<'_>) -> Outcome {
    shapes::sampled_range(ctx, "user_ratings", "rating", 1.0, 5.0)
}

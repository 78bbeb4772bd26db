//! Recommendation engine invariants, checked against the scoring source and
//! against generated recommendations.

use regex::Regex;
use reelcheck_core::model::{Outcome, Section, Severity};

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

/// File holding the scoring weights and ranking pipeline.
pub const SCORING_FILE: &str = "scoring.ts";

/// Weight declarations, e.g. `export const WEIGHT_GENRE = 0.35;`.
const WEIGHT_PATTERN: &str = r"\bWEIGHT_[A-Z_]+\s*[:=]\s*([0-9]*\.?[0-9]+)";

/// Tolerance on the weight sum.
const WEIGHT_SUM_EPSILON: f64 = 0.01;

pub const SECTION: SectionDef = SectionDef {
    section: Section::EngineInvariants,
    declared: 6,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Scoring module present",
            severity: Severity::High,
            source_ref: Some(SCORING_FILE),
            run: scoring_module_present,
        },
        CheckDef {
            ordinal: 2,
            name: "Scoring weights sum to 1.0",
            severity: Severity::High,
            source_ref: Some(SCORING_FILE),
            run: weights_sum_to_one,
        },
        CheckDef {
            ordinal: 3,
            name: "Diversity penalty applied",
            severity: Severity::Medium,
            source_ref: Some(SCORING_FILE),
            run: diversity_penalty,
        },
        CheckDef {
            ordinal: 4,
            name: "Already-rated titles excluded",
            severity: Severity::High,
            source_ref: Some(SCORING_FILE),
            run: excludes_rated,
        },
        CheckDef {
            ordinal: 5,
            name: "Recommendation scores within 0-1",
            severity: Severity::Medium,
            source_ref: Some("recommendations.score"),
            run: score_range,
        },
        CheckDef {
            ordinal: 6,
            name: "Recommendations not stuck on one title",
            severity: Severity::High,
            source_ref: Some("recommendations.movie_id"),
            run: not_stuck,
        },
    ],
};

fn scoring_module_present(ctx: &AuditContext<'_>) -> Outcome {
    shapes::file_present(ctx, ctx.source, SCORING_FILE)
}

fn weights_sum_to_one(ctx: &AuditContext<'_>) -> Outcome {
    let tree = match ctx.source_tree() {
        Ok(tree) => tree,
        Err(outcome) => return outcome,
    };
    let Some(path) = tree.find_file(SCORING_FILE) else {
        return ctx.missing(format!("{SCORING_FILE} not found"));
    };
    let Some(text) = tree.read_text(&path) else {
        return ctx.missing(format!("{SCORING_FILE} unreadable"));
    };
    let weights = match extract_weights(&text) {
        Ok(w) => w,
        Err(e) => return Outcome::skip(e),
    };
    if weights.is_empty() {
        return Outcome::fail("WEIGHT_* declarations", "none found");
    }
    let sum: f64 = weights.iter().sum();
    Outcome::check(
        (sum - 1.0).abs() <= WEIGHT_SUM_EPSILON,
        "1.00",
        format!("{sum:.2}"),
    )
    .detail(format!("{} weights", weights.len()))
}

/// Every `WEIGHT_*` literal in `text`.
pub fn extract_weights(text: &str) -> Result<Vec<f64>, String> {
    let re = Regex::new(WEIGHT_PATTERN).map_err(|e| e.to_string())?;
    Ok(re
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect())
}

fn diversity_penalty(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_in_file(ctx, ctx.source, SCORING_FILE, r"diversity")
}

fn excludes_rated(ctx: &AuditContext<'_>) -> Outcome {
    shapes::pattern_in_file(
        ctx,
        ctx.source,
        SCORING_FILE,
        r"(exclude|filter|skip)\w*.*(rated|watched|seen)",
    )
}

fn score_range(ctx: &AuditContext<'_>) -> Outcome {
    shapes::sampled_range(ctx, "recommendations", "score", 0.0, 1.0)
}

fn not_stuck(ctx: &AuditContext<'_>) -> Outcome {
    shapes::not_uniform(ctx, "recommendations", "movie_id")
}

//! Catalog data quality: coverage of the fields recommendations and
//! detail pages depend on, nested score structure, and sanity bounds.

use std::collections::HashMap;

use chrono::Datelike;
use reelcheck_core::constants::MAX_SAMPLE_ROWS;
use reelcheck_core::model::{Outcome, Section, Severity};
use serde_json::Value;

use super::shapes::{self, StructuralRule};
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

/// Titles every catalog import is expected to carry with complete metadata.
pub const REFERENCE_TITLES: &[&str] = &[
    "The Godfather",
    "Inception",
    "Parasite",
    "Spirited Away",
    "The Dark Knight",
    "Pulp Fiction",
    "Whiplash",
    "Arrival",
    "Coco",
    "Amelie",
];

pub const MOOD_KEYS: &[&str] = &["energy", "tone", "pace", "intensity"];

pub const SECTION: SectionDef = SectionDef {
    section: Section::DataIntegrity,
    declared: 10,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Poster coverage",
            severity: Severity::High,
            source_ref: Some("movies.poster_url"),
            run: poster_coverage,
        },
        CheckDef {
            ordinal: 2,
            name: "Overview coverage",
            severity: Severity::High,
            source_ref: Some("movies.overview"),
            run: overview_coverage,
        },
        CheckDef {
            ordinal: 3,
            name: "Genre coverage",
            severity: Severity::Medium,
            source_ref: Some("movies.genres"),
            run: genre_coverage,
        },
        CheckDef {
            ordinal: 4,
            name: "Embedding coverage",
            severity: Severity::Critical,
            source_ref: Some("movies.embedding"),
            run: embedding_coverage,
        },
        CheckDef {
            ordinal: 5,
            name: "Mood scores well-formed",
            severity: Severity::High,
            source_ref: Some("movies.mood_scores"),
            run: mood_scores_structure,
        },
        CheckDef {
            ordinal: 6,
            name: "No duplicate title/year pairs",
            severity: Severity::Medium,
            source_ref: Some("movies.title+release_year"),
            run: no_duplicate_titles,
        },
        CheckDef {
            ordinal: 7,
            name: "Release years plausible",
            severity: Severity::Medium,
            source_ref: Some("movies.release_year"),
            run: release_year_sanity,
        },
        CheckDef {
            ordinal: 8,
            name: "Reference titles complete",
            severity: Severity::High,
            source_ref: Some("catalog import"),
            run: reference_titles,
        },
        CheckDef {
            ordinal: 9,
            name: "Vote averages within 0-10",
            severity: Severity::Medium,
            source_ref: Some("movies.vote_average"),
            run: vote_average_range,
        },
    ],
};

fn poster_coverage(ctx: &AuditContext<'_>) -> Outcome {
    shapes::coverage(ctx, "movies", "poster_url=is.null")
}

fn overview_coverage(ctx: &AuditContext<'_>) -> Outcome {
    shapes::coverage(ctx, "movies", "overview=is.null")
}

fn genre_coverage(ctx: &AuditContext<'_>) -> Outcome {
    shapes::coverage(ctx, "movies", "genres=is.null")
}

fn embedding_coverage(ctx: &AuditContext<'_>) -> Outcome {
    shapes::coverage(ctx, "movies", "embedding=is.null")
}

fn mood_scores_structure(ctx: &AuditContext<'_>) -> Outcome {
    shapes::sampled_structure(
        ctx,
        &StructuralRule {
            table: "movies",
            column: "mood_scores",
            required_keys: MOOD_KEYS,
            value_range: Some((0.0, 1.0)),
            reject_uniform: true,
        },
    )
}

fn no_duplicate_titles(ctx: &AuditContext<'_>) -> Outcome {
    let sample = ctx
        .remote
        .sample("movies", "title,release_year", MAX_SAMPLE_ROWS);
    if !sample.ok() {
        return ctx.missing(format!("movies: {}", sample.describe()));
    }
    if sample.data.is_empty() {
        return ctx.no_data("movies has no rows");
    }

    let mut seen: HashMap<(String, Option<i64>), usize> = HashMap::new();
    for row in &sample.data {
        let Some(title) = row.get("title").and_then(Value::as_str) else {
            continue;
        };
        let year = row.get("release_year").and_then(Value::as_i64);
        *seen.entry((title.trim().to_lowercase(), year)).or_default() += 1;
    }
    let mut duplicates: Vec<String> = seen
        .iter()
        .filter(|(_, n)| **n > 1)
        .map(|((title, year), n)| match year {
            Some(y) => format!("{title} ({y}) x{n}"),
            None => format!("{title} x{n}"),
        })
        .collect();
    duplicates.sort();

    let outcome = Outcome::check(
        duplicates.is_empty(),
        "0 duplicates",
        format!("{} duplicates in {} sampled rows", duplicates.len(), sample.data.len()),
    );
    if duplicates.is_empty() {
        outcome
    } else {
        outcome.detail(duplicates.join(", "))
    }
}

fn release_year_sanity(ctx: &AuditContext<'_>) -> Outcome {
    let latest = chrono::Utc::now().year() + 2;
    let filter = format!("or=(release_year.lt.1888,release_year.gt.{latest})");
    shapes::none_matching(ctx, "movies", &[filter.as_str()], "implausible release years")
}

fn reference_titles(ctx: &AuditContext<'_>) -> Outcome {
    shapes::spot_check(
        ctx,
        "movies",
        "title",
        "title,poster_url,overview",
        REFERENCE_TITLES,
        has_poster_and_overview,
    )
}

fn has_poster_and_overview(row: &Value) -> bool {
    let filled = |field: &str| {
        row.get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    };
    filled("poster_url") && filled("overview")
}

fn vote_average_range(ctx: &AuditContext<'_>) -> Outcome {
    shapes::none_matching(
        ctx,
        "movies",
        &["or=(vote_average.lt.0,vote_average.gt.10)"],
        "out-of-range vote averages",
    )
}

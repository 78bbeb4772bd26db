//! Public website: reachability, metadata and crawler files.

use regex::Regex;
use reelcheck_core::model::{Outcome, Section, Severity};
use serde_json::Value;

use super::shapes;
use super::{CheckDef, SectionDef};
use crate::context::AuditContext;

pub const SECTION: SectionDef = SectionDef {
    section: Section::Website,
    declared: 7,
    checks: &[
        CheckDef {
            ordinal: 1,
            name: "Home page reachable",
            severity: Severity::Critical,
            source_ref: Some("/"),
            run: home_reachable,
        },
        CheckDef {
            ordinal: 2,
            name: "Home page has a title",
            severity: Severity::Medium,
            source_ref: Some("/"),
            run: home_title,
        },
        CheckDef {
            ordinal: 3,
            name: "Canonical link declared",
            severity: Severity::Low,
            source_ref: Some("/"),
            run: canonical_link,
        },
        CheckDef {
            ordinal: 4,
            name: "No placeholder text on home page",
            severity: Severity::Medium,
            source_ref: Some("/"),
            run: no_placeholder_text,
        },
        CheckDef {
            ordinal: 5,
            name: "Sitemap published",
            severity: Severity::Medium,
            source_ref: Some("/sitemap.xml"),
            run: sitemap,
        },
        CheckDef {
            ordinal: 6,
            name: "robots.txt references sitemap",
            severity: Severity::Low,
            source_ref: Some("/robots.txt"),
            run: robots,
        },
        CheckDef {
            ordinal: 7,
            name: "Movie detail page renders",
            severity: Severity::High,
            source_ref: Some("/movie/<id>"),
            run: movie_detail_page,
        },
    ],
};

fn home_reachable(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/", &[])
}

fn home_title(ctx: &AuditContext<'_>) -> Outcome {
    let Some(url) = ctx.site_url("/") else {
        return ctx.missing("site URL not configured");
    };
    let resp = ctx.web.get(&url);
    if !resp.ok() {
        return ctx.missing(format!("{url}: {}", resp.describe()));
    }
    match page_title(&resp.body) {
        Some(title) => Outcome::pass().expected("non-empty <title>").actual(title),
        None => Outcome::fail("non-empty <title>", "absent or empty"),
    }
}

/// Trimmed text of the first `<title>` element, if non-empty.
pub fn page_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()?;
    let title = re.captures(html)?.get(1)?.as_str().trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn canonical_link(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/", &["rel=\"canonical\""])
}

fn no_placeholder_text(ctx: &AuditContext<'_>) -> Outcome {
    shapes::body_lacks(ctx, "/", &["lorem ipsum", "coming soon", "{{"])
}

fn sitemap(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/sitemap.xml", &["<urlset"])
}

fn robots(ctx: &AuditContext<'_>) -> Outcome {
    shapes::reachable(ctx, "/robots.txt", &["sitemap"])
}

fn movie_detail_page(ctx: &AuditContext<'_>) -> Outcome {
    let sample = ctx.remote.sample("movies", "id,title", 1);
    if !sample.ok() {
        return ctx.missing(format!("movies: {}", sample.describe()));
    }
    let Some(row) = sample.data.first() else {
        return ctx.no_data("movies has no rows");
    };
    let id = match row.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return ctx.missing("movie row without an id"),
    };
    let title = row.get("title").and_then(Value::as_str).unwrap_or_default();
    let needles: Vec<&str> = if title.is_empty() { vec![] } else { vec![title] };
    shapes::reachable(ctx, &format!("/movie/{id}"), &needles)
}

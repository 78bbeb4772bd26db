//! Reusable check shapes. Section tables are mostly thin bindings of these
//! to concrete tables, columns, paths and patterns.

use std::collections::HashSet;
use std::path::Path;

use reelcheck_core::constants::MAX_SAMPLE_ROWS;
use reelcheck_core::model::{FieldValue, Outcome};
use reelcheck_sources::{CredentialTier, GrepMatch, QueryResult, SourceTree};
use serde_json::{Map, Value};

use crate::context::AuditContext;

/// Locations listed in a failing scan's detail.
const MAX_LISTED_MATCHES: usize = 3;

/// A value whose numeric dimensions are all equal is stuck once it has at
/// least this many of them.
pub const MIN_STUCK_DIMENSIONS: usize = 4;

// ─── Remote data ────────────────────────────────────────────────────────

/// Exact row count of `table` under `filters`. A failed read or a response
/// without an exact total is returned as the outcome to report instead.
pub fn exact_count(ctx: &AuditContext<'_>, table: &str, filters: &[&str]) -> Result<u64, Outcome> {
    let result = ctx.remote.count(table, filters);
    let label = if filters.is_empty() {
        table.to_string()
    } else {
        format!("{table} ({})", filters.join("&"))
    };
    if !result.ok() {
        return Err(ctx.missing(format!("{label}: {}", result.describe())));
    }
    result
        .count
        .ok_or_else(|| ctx.missing(format!("{label}: exact count unavailable")))
}

/// Share of `table` rows where the column named by `null_filter` is set,
/// graded against the coverage bands.
pub fn coverage(ctx: &AuditContext<'_>, table: &str, null_filter: &str) -> Outcome {
    let total = match exact_count(ctx, table, &[]) {
        Ok(n) => n,
        Err(outcome) => return outcome,
    };
    if total == 0 {
        return ctx.no_data(format!("{table} has no rows"));
    }

    let nulls = match exact_count(ctx, table, &[null_filter]) {
        Ok(n) => n.min(total),
        Err(outcome) => return outcome,
    };

    let pct = (total - nulls) as f64 / total as f64 * 100.0;
    let outcome = Outcome::graded(pct, &ctx.coverage_bands());
    let counts = format!("{nulls} of {total} rows match {null_filter}");
    match outcome.detail.clone() {
        Some(d) => outcome.detail(format!("{d}; {counts}")),
        None => outcome.detail(counts),
    }
}

/// Count of rows matching `filters` must be zero.
pub fn none_matching(ctx: &AuditContext<'_>, table: &str, filters: &[&str], what: &str) -> Outcome {
    let n = match exact_count(ctx, table, filters) {
        Ok(n) => n,
        Err(outcome) => return outcome,
    };
    Outcome::check(n == 0, format!("0 {what}"), format!("{n} {what}"))
        .detail(format!("{table} filtered by {}", filters.join("&")))
}

/// Rows created in the last `days` days. Zero rows is the no-data case.
pub fn recent_activity(ctx: &AuditContext<'_>, table: &str, days: i64) -> Outcome {
    let since = chrono::Utc::now() - chrono::Duration::days(days);
    let filter = format!("created_at=gte.{}", since.format("%Y-%m-%dT%H:%M:%SZ"));
    match exact_count(ctx, table, &[filter.as_str()]) {
        Ok(0) => ctx.no_data(format!("no {table} rows in the last {days} days")),
        Ok(n) => Outcome::pass()
            .expected(format!("activity within {days} days"))
            .actual(format!("{n} rows")),
        Err(outcome) => outcome,
    }
}

/// Rules for a sampled structural check over one nested column.
#[derive(Debug, Clone, Copy)]
pub struct StructuralRule<'r> {
    pub table: &'r str,
    pub column: &'r str,
    /// Keys every present value must carry.
    pub required_keys: &'r [&'r str],
    /// Inclusive numeric range every required key's value must fall in.
    pub value_range: Option<(f64, f64)>,
    /// Fail on stuck generator output: a value whose numeric dimensions
    /// are all equal, or a sample where every value is identical.
    pub reject_uniform: bool,
}

/// Sample up to [`MAX_SAMPLE_ROWS`] rows and validate the nested column.
/// Malformed values count as absent for their row.
pub fn sampled_structure(ctx: &AuditContext<'_>, rule: &StructuralRule<'_>) -> Outcome {
    let sample = ctx.remote.sample(rule.table, rule.column, MAX_SAMPLE_ROWS);
    if !sample.ok() {
        return ctx.missing(format!("{}: {}", rule.table, sample.describe()));
    }
    if sample.data.is_empty() {
        return ctx.no_data(format!("{} has no rows", rule.table));
    }

    let rows = sample.data.len();
    let present: Vec<Map<String, Value>> = sample
        .data
        .iter()
        .filter_map(|row| FieldValue::from_row(row, rule.column))
        .filter_map(FieldValue::into_object)
        .collect();
    if present.is_empty() {
        return Outcome::fail(
            format!("{} populated", rule.column),
            format!("absent or malformed in all {rows} sampled rows"),
        );
    }

    let mut violations = 0usize;
    let mut first_violation = None;
    for value in &present {
        if let Some(problem) = violation(value, rule) {
            violations += 1;
            first_violation.get_or_insert(problem);
        }
    }
    if violations > 0 {
        let mut outcome = Outcome::fail(
            "0 structural violations",
            format!("{violations} of {} sampled values", present.len()),
        );
        if let Some(problem) = first_violation {
            outcome = outcome.detail(format!("first: {problem}"));
        }
        return outcome;
    }

    if rule.reject_uniform {
        let stuck = present.iter().filter(|v| is_stuck(v)).count();
        if stuck > 0 {
            return Outcome::fail(
                "0 stuck values",
                format!("{stuck} of {} sampled values stuck", present.len()),
            )
            .detail(format!(
                "all numeric dimensions identical in {stuck} {} values",
                rule.column
            ));
        }
    }

    if rule.reject_uniform && present.len() > 1 && present.iter().all(|v| v == &present[0]) {
        return Outcome::fail(
            "varied values",
            format!("all {} sampled values identical", present.len()),
        );
    }

    Outcome::pass()
        .expected("well-formed values")
        .actual(format!("{} of {rows} sampled rows valid", present.len()))
}

/// Every numeric dimension of `value` is the same number.
fn is_stuck(value: &Map<String, Value>) -> bool {
    let dims: Vec<f64> = value.values().filter_map(Value::as_f64).collect();
    dims.len() >= MIN_STUCK_DIMENSIONS && dims.iter().all(|d| *d == dims[0])
}

fn violation(value: &Map<String, Value>, rule: &StructuralRule<'_>) -> Option<String> {
    for key in rule.required_keys {
        let Some(v) = value.get(*key) else {
            return Some(format!("missing key {key}"));
        };
        if let Some((lo, hi)) = rule.value_range {
            match v.as_f64() {
                Some(n) if (lo..=hi).contains(&n) => {}
                Some(n) => return Some(format!("{key}={n} outside [{lo}, {hi}]")),
                None => return Some(format!("{key} is not numeric")),
            }
        }
    }
    None
}

/// Every sampled value of a scalar column falls in `[lo, hi]`.
pub fn sampled_range(ctx: &AuditContext<'_>, table: &str, column: &str, lo: f64, hi: f64) -> Outcome {
    let sample = ctx.remote.sample(table, column, MAX_SAMPLE_ROWS);
    if !sample.ok() {
        return ctx.missing(format!("{table}: {}", sample.describe()));
    }
    let values: Vec<f64> = sample
        .data
        .iter()
        .filter_map(|row| row.get(column).and_then(Value::as_f64))
        .collect();
    if values.is_empty() {
        return ctx.no_data(format!("no {table}.{column} values"));
    }
    let out_of_range = values.iter().filter(|v| !(lo..=hi).contains(*v)).count();
    Outcome::check(
        out_of_range == 0,
        format!("all {column} in [{lo}, {hi}]"),
        format!("{out_of_range} of {} sampled out of range", values.len()),
    )
}

/// Fails when every sampled value of `column` is the same.
pub fn not_uniform(ctx: &AuditContext<'_>, table: &str, column: &str) -> Outcome {
    let sample = ctx.remote.sample(table, column, MAX_SAMPLE_ROWS);
    if !sample.ok() {
        return ctx.missing(format!("{table}: {}", sample.describe()));
    }
    let values: Vec<&Value> = sample
        .data
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|v| !v.is_null())
        .collect();
    if values.is_empty() {
        return ctx.no_data(format!("no {table}.{column} values"));
    }
    let distinct: HashSet<String> = values.iter().map(|v| v.to_string()).collect();
    Outcome::check(
        values.len() == 1 || distinct.len() > 1,
        "more than one distinct value",
        format!("{} distinct of {} sampled", distinct.len(), values.len()),
    )
}

/// Read `table` under both tiers; the restricted tier must be denied or see
/// nothing. The service-tier read must succeed first, otherwise a denial
/// says nothing about access policy.
pub fn access_denied(ctx: &AuditContext<'_>, table: &str) -> Outcome {
    if !ctx.remote.has_tier(CredentialTier::Anonymous) {
        return ctx.missing("no anonymous credential configured");
    }
    let service = ctx.remote.sample(table, "*", 1);
    if !service.ok() {
        return ctx.missing(format!("{table}: {}", service.describe()));
    }
    let anon = ctx
        .remote
        .sample_as(table, "*", 1, CredentialTier::Anonymous);
    tier_denied(ctx, table, &anon)
}

/// An anonymous insert into `table` must be rejected.
pub fn insert_denied(ctx: &AuditContext<'_>, table: &str, probe_row: Value) -> Outcome {
    if !ctx.remote.has_tier(CredentialTier::Anonymous) {
        return ctx.missing("no anonymous credential configured");
    }
    let request = reelcheck_sources::QueryRequest::post(table, probe_row)
        .tier(CredentialTier::Anonymous);
    let result = ctx.remote.query(&request);
    if result.is_transport_error() {
        return ctx.missing(format!("{table}: {}", result.describe()));
    }
    if result.created() {
        Outcome::fail("anonymous insert rejected", format!("HTTP {} (row accepted)", result.status))
            .detail(format!("{table} accepts anonymous writes"))
    } else {
        Outcome::pass()
            .expected("anonymous insert rejected")
            .actual(result.describe())
    }
}

fn tier_denied(ctx: &AuditContext<'_>, table: &str, anon: &QueryResult) -> Outcome {
    if anon.is_transport_error() {
        return ctx.missing(format!("{table} (anonymous): {}", anon.describe()));
    }
    if anon.denied_or_empty() {
        Outcome::pass()
            .expected("anonymous read denied or empty")
            .actual(if anon.is_success() {
                "0 rows".to_string()
            } else {
                anon.describe()
            })
    } else {
        Outcome::fail(
            "anonymous read denied or empty",
            format!("{} rows visible", anon.data.len()),
        )
        .detail(format!("row-level security is not restricting {table}"))
    }
}

/// Reference spot check: at least `ratio` of `items` must exist in `table`
/// (matched on `key_column`) and satisfy `property`.
pub fn spot_check(
    ctx: &AuditContext<'_>,
    table: &str,
    key_column: &str,
    columns: &str,
    items: &[&str],
    property: fn(&Value) -> bool,
) -> Outcome {
    if items.is_empty() {
        return Outcome::skip("no reference items listed");
    }
    let ratio = ctx.config.governance.effective_spot_check_ratio();
    let mut satisfied = Vec::new();
    let mut unsatisfied = Vec::new();
    for item in items {
        let path = format!(
            "{table}?select={columns}&{key_column}=eq.{}&limit=1",
            encode_value(item)
        );
        let result = ctx.remote.query(&reelcheck_sources::QueryRequest::get(path));
        if !result.ok() {
            return ctx.missing(format!("{table}: {}", result.describe()));
        }
        match result.data.first() {
            Some(row) if property(row) => satisfied.push(*item),
            _ => unsatisfied.push(*item),
        }
    }

    let share = satisfied.len() as f64 / items.len() as f64;
    let outcome = Outcome::check(
        share >= ratio,
        format!(">= {:.0}% of reference items", ratio * 100.0),
        format!("{}/{} ({:.0}%)", satisfied.len(), items.len(), share * 100.0),
    );
    if unsatisfied.is_empty() {
        outcome
    } else {
        outcome.detail(format!("not satisfied: {}", unsatisfied.join(", ")))
    }
}

/// Percent-encode a filter value for a query string.
pub fn encode_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

// ─── Web ────────────────────────────────────────────────────────────────

/// GET a site path; pass on 2xx with every `needles` substring present.
pub fn reachable(ctx: &AuditContext<'_>, path: &str, needles: &[&str]) -> Outcome {
    let Some(url) = ctx.site_url(path) else {
        return ctx.missing("site URL not configured");
    };
    let resp = ctx.web.get(&url);
    if !resp.reached() {
        return ctx.missing(format!("{url}: {}", resp.describe()));
    }
    if !resp.ok() {
        return Outcome::fail("HTTP 2xx", resp.describe()).detail(url);
    }
    let missing: Vec<&str> = needles
        .iter()
        .copied()
        .filter(|n| !resp.contains(n))
        .collect();
    if missing.is_empty() {
        Outcome::pass().expected("HTTP 2xx").actual(resp.describe())
    } else {
        Outcome::fail(
            format!("body contains {}", needles.join(", ")),
            format!("missing {}", missing.join(", ")),
        )
        .detail(url)
    }
}

/// GET a site path; the body must not contain any of `needles`.
pub fn body_lacks(ctx: &AuditContext<'_>, path: &str, needles: &[&str]) -> Outcome {
    let Some(url) = ctx.site_url(path) else {
        return ctx.missing("site URL not configured");
    };
    let resp = ctx.web.get(&url);
    if !resp.ok() {
        return ctx.missing(format!("{url}: {}", resp.describe()));
    }
    let found: Vec<&str> = needles
        .iter()
        .copied()
        .filter(|n| resp.contains(n))
        .collect();
    Outcome::check(
        found.is_empty(),
        format!("none of {}", needles.join(", ")),
        if found.is_empty() {
            "none found".to_string()
        } else {
            format!("found {}", found.join(", "))
        },
    )
}

/// GET a site path; the named response header must be present.
pub fn header_present(ctx: &AuditContext<'_>, path: &str, header: &str) -> Outcome {
    let Some(url) = ctx.site_url(path) else {
        return ctx.missing("site URL not configured");
    };
    let resp = ctx.web.get(&url);
    if !resp.reached() {
        return ctx.missing(format!("{url}: {}", resp.describe()));
    }
    match resp.header(header) {
        Some(value) => Outcome::pass()
            .expected(format!("{header} header"))
            .actual(value.to_string()),
        None => Outcome::fail(format!("{header} header"), "absent").detail(url),
    }
}

// ─── Source ─────────────────────────────────────────────────────────────

/// A file named `filename` exists somewhere in the tree.
pub fn file_present(ctx: &AuditContext<'_>, tree: Option<&SourceTree>, filename: &str) -> Outcome {
    let Some(tree) = tree else {
        return ctx.missing("source root not configured");
    };
    match tree.find_file(filename) {
        Some(path) => Outcome::pass()
            .expected(format!("{filename} present"))
            .actual(tree.relative(&path).display().to_string()),
        None => Outcome::fail(format!("{filename} present"), "not found"),
    }
}

/// `pattern` appears in the located `filename`. A missing file is a missing
/// prerequisite, not a failure.
pub fn pattern_in_file(
    ctx: &AuditContext<'_>,
    tree: Option<&SourceTree>,
    filename: &str,
    pattern: &str,
) -> Outcome {
    let Some(tree) = tree else {
        return ctx.missing("source root not configured");
    };
    let Some(path) = tree.find_file(filename) else {
        return ctx.missing(format!("{filename} not found"));
    };
    match tree.grep_file(&path, pattern) {
        Ok(matches) if !matches.is_empty() => Outcome::pass()
            .expected(format!("/{pattern}/ in {filename}"))
            .actual(locations(tree, &matches)),
        Ok(_) => Outcome::fail(format!("/{pattern}/ in {filename}"), "no match")
            .detail(tree.relative(&path).display().to_string()),
        Err(e) => Outcome::skip(e.to_string()),
    }
}

/// `pattern` appears somewhere in the tree.
pub fn pattern_present(ctx: &AuditContext<'_>, tree: Option<&SourceTree>, pattern: &str) -> Outcome {
    let Some(tree) = tree else {
        return ctx.missing("source root not configured");
    };
    match tree.grep_tree(pattern) {
        Ok(matches) if !matches.is_empty() => Outcome::pass()
            .expected(format!("/{pattern}/ present"))
            .actual(format!("{} occurrences", matches.len()))
            .detail(locations(tree, &matches)),
        Ok(_) => Outcome::fail(format!("/{pattern}/ present"), "0 occurrences"),
        Err(e) => Outcome::skip(e.to_string()),
    }
}

/// `pattern` appears nowhere in the files `include` accepts.
pub fn pattern_absent(
    ctx: &AuditContext<'_>,
    tree: Option<&SourceTree>,
    pattern: &str,
    include: impl Fn(&Path) -> bool,
) -> Outcome {
    let Some(tree) = tree else {
        return ctx.missing("source root not configured");
    };
    match tree.grep_where(pattern, include) {
        Ok(matches) if matches.is_empty() => Outcome::pass()
            .expected("0 occurrences")
            .actual("0 occurrences"),
        Ok(matches) => Outcome::fail("0 occurrences", format!("{} occurrences", matches.len()))
            .detail(locations(tree, &matches)),
        Err(e) => Outcome::skip(e.to_string()),
    }
}

fn locations(tree: &SourceTree, matches: &[GrepMatch]) -> String {
    let mut listed: Vec<String> = matches
        .iter()
        .take(MAX_LISTED_MATCHES)
        .map(|m| format!("{}:{}", tree.relative(&m.path).display(), m.line_number))
        .collect();
    if matches.len() > MAX_LISTED_MATCHES {
        listed.push(format!("+{} more", matches.len() - MAX_LISTED_MATCHES));
    }
    listed.join(", ")
}

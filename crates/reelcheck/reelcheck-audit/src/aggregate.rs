//! Run aggregation and skip-rate compliance. Pure functions over results.

use std::collections::BTreeMap;

use reelcheck_core::config::GovernanceConfig;
use reelcheck_core::model::{CheckResult, Section, SectionStats};
use serde::{Deserialize, Serialize};

/// One row of the compliance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCompliance {
    pub section: Section,
    pub stats: SectionStats,
    /// `skipped / total`.
    pub skip_rate: f64,
    pub threshold: f64,
    pub compliant: bool,
}

/// Per-section statistics in section order, in one pass over `results`.
pub fn section_stats(results: &[CheckResult]) -> BTreeMap<Section, SectionStats> {
    let mut stats: BTreeMap<Section, SectionStats> = BTreeMap::new();
    for result in results {
        stats.entry(result.section).or_default().add(result);
    }
    stats
}

/// Compliance rows for `sections`, in the order given.
pub fn compliance_table(
    results: &[CheckResult],
    sections: &[Section],
    governance: &GovernanceConfig,
) -> Vec<SectionCompliance> {
    let stats = section_stats(results);
    sections
        .iter()
        .map(|&section| {
            let stats = stats.get(&section).copied().unwrap_or_default();
            let skip_rate = stats.skip_rate();
            let threshold = governance.skip_threshold(section);
            SectionCompliance {
                section,
                stats,
                skip_rate,
                threshold,
                compliant: skip_rate <= threshold,
            }
        })
        .collect()
}

/// Summary note naming every section over its skip threshold, if any.
pub fn breach_notes(rows: &[SectionCompliance]) -> Option<String> {
    let breaches: Vec<String> = rows
        .iter()
        .filter(|r| !r.compliant)
        .map(|r| {
            format!(
                "{} skip rate {:.0}% exceeds {:.0}%",
                r.section,
                r.skip_rate * 100.0,
                r.threshold * 100.0
            )
        })
        .collect();
    (!breaches.is_empty()).then(|| breaches.join("; "))
}

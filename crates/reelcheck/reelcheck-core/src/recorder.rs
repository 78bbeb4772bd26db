//! Append-only result recording.
//!
//! [`SectionRecorder`] owns the results of one section and guarantees that
//! every declared id in `1..=declared` is emitted exactly once: ids no check
//! touched are filled with a skip when the section finishes.
//! [`ResultCollector`] is the run-wide accumulator the controller passes
//! through the run; it rejects duplicate ids and never removes anything.

use std::collections::{BTreeMap, HashSet};

use crate::errors::RecordError;
use crate::model::{CheckResult, Section};

/// Reason recorded on declared ids that no check produced.
pub const UNFILLED_REASON: &str = "not yet automated";

/// Collects the results of one section.
#[derive(Debug)]
pub struct SectionRecorder {
    section: Section,
    declared: u32,
    results: BTreeMap<u32, CheckResult>,
}

impl SectionRecorder {
    pub fn new(section: Section, declared: u32) -> Self {
        Self {
            section,
            declared,
            results: BTreeMap::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Record a result. Its id must fall inside the declared range and must
    /// not have been recorded before.
    pub fn record(&mut self, result: CheckResult) -> Result<(), RecordError> {
        let ordinal = self
            .ordinal_of(&result)
            .ok_or_else(|| RecordError::Undeclared {
                check_id: result.check_id.clone(),
                section: self.section.to_string(),
            })?;
        if self.results.contains_key(&ordinal) {
            return Err(RecordError::DuplicateCheckId {
                check_id: result.check_id,
            });
        }
        self.results.insert(ordinal, result);
        Ok(())
    }

    pub fn is_recorded(&self, ordinal: u32) -> bool {
        self.results.contains_key(&ordinal)
    }

    pub fn recorded_count(&self) -> usize {
        self.results.len()
    }

    /// Close the section: fill untouched ids with a skip and return the
    /// dense, ordinal-ordered result list.
    pub fn finish(mut self) -> Vec<CheckResult> {
        let section = self.section;
        for ordinal in 1..=self.declared {
            self.results.entry(ordinal).or_insert_with(|| {
                CheckResult::unfilled(section.check_id(ordinal), section, UNFILLED_REASON)
            });
        }
        self.results.into_values().collect()
    }

    fn ordinal_of(&self, result: &CheckResult) -> Option<u32> {
        if result.section != self.section {
            return None;
        }
        let ordinal: u32 = result
            .check_id
            .strip_prefix(self.section.prefix())?
            .parse()
            .ok()?;
        (1..=self.declared).contains(&ordinal).then_some(ordinal)
    }
}

/// Run-wide, append-only result collection.
#[derive(Debug, Default)]
pub struct ResultCollector {
    results: Vec<CheckResult>,
    ids: HashSet<String>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one result. Duplicate ids are rejected.
    pub fn record(&mut self, result: CheckResult) -> Result<(), RecordError> {
        if !self.ids.insert(result.check_id.clone()) {
            return Err(RecordError::DuplicateCheckId {
                check_id: result.check_id,
            });
        }
        self.results.push(result);
        Ok(())
    }

    /// Append a finished section. Returns the errors of rejected results;
    /// accepted results are kept regardless.
    pub fn absorb(&mut self, results: Vec<CheckResult>) -> Vec<RecordError> {
        let mut rejected = Vec::new();
        for result in results {
            if let Err(e) = self.record(result) {
                tracing::warn!(error = %e, "result rejected by collector");
                rejected.push(e);
            }
        }
        rejected
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<CheckResult> {
        self.results
    }
}

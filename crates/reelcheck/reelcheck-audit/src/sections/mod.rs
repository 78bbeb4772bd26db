//! Declarative check tables.
//!
//! Each section module exposes one [`SectionDef`]: a fixed id range and a
//! static table of checks. Ordinals inside the range that have no entry are
//! filled with a skip by the runner.

pub mod shapes;

pub mod backend;
pub mod compliance;
pub mod data_integrity;
pub mod engine_invariants;
pub mod ios_build;
pub mod marketing;
pub mod retention;
pub mod security;
pub mod user_experience;
pub mod website;

use reelcheck_core::model::{Outcome, Section, Severity};

use crate::context::AuditContext;

/// The single signature every check conforms to.
pub type CheckFn = fn(&AuditContext<'_>) -> Outcome;

/// One check: identity, reporting weight and the function that evaluates it.
#[derive(Clone, Copy)]
pub struct CheckDef {
    pub ordinal: u32,
    pub name: &'static str,
    pub severity: Severity,
    /// The product invariant this check validates.
    pub source_ref: Option<&'static str>,
    pub run: CheckFn,
}

/// A section: its declared id range and its checks.
#[derive(Clone, Copy)]
pub struct SectionDef {
    pub section: Section,
    /// Ids `1..=declared` are emitted exactly once per run.
    pub declared: u32,
    pub checks: &'static [CheckDef],
}

impl SectionDef {
    pub fn prefix(&self) -> char {
        self.section.prefix()
    }
}

impl std::fmt::Debug for SectionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionDef")
            .field("section", &self.section)
            .field("declared", &self.declared)
            .field("checks", &self.checks.len())
            .finish()
    }
}

/// Definition of one section.
pub fn definition(section: Section) -> SectionDef {
    match section {
        Section::DataIntegrity => data_integrity::SECTION,
        Section::EngineInvariants => engine_invariants::SECTION,
        Section::UserExperience => user_experience::SECTION,
        Section::Compliance => compliance::SECTION,
        Section::Website => website::SECTION,
        Section::Backend => backend::SECTION,
        Section::IosBuild => ios_build::SECTION,
        Section::Marketing => marketing::SECTION,
        Section::Retention => retention::SECTION,
        Section::Security => security::SECTION,
    }
}

/// All ten sections in execution order.
pub fn all_sections() -> Vec<SectionDef> {
    Section::all().iter().copied().map(definition).collect()
}

//! # reelcheck-core
//!
//! Shared foundation for the reelcheck audit runner: the check result model,
//! the append-only recorder, configuration, errors, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod recorder;
pub mod tracing;

pub use model::{
    CheckResult, CheckStatus, FieldValue, Outcome, RunSummary, Section, SectionStats, Severity,
};
pub use recorder::{ResultCollector, SectionRecorder};

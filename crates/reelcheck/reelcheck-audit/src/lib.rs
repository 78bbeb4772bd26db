//! # reelcheck-audit
//!
//! The check-orchestration engine: ten declarative check sections, the
//! section runner with fill sweep and panic containment, run aggregation and
//! skip-rate compliance, remote publishing with a local fallback artifact,
//! and report rendering.

pub mod aggregate;
pub mod context;
pub mod controller;
pub mod publish;
pub mod reporters;
pub mod runner;
pub mod sections;

pub use aggregate::SectionCompliance;
pub use context::AuditContext;
pub use controller::{AuditController, AuditReport};
pub use publish::{PublishOutcome, Publisher};
pub use sections::{CheckDef, CheckFn, SectionDef};

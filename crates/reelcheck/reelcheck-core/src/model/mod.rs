//! Result model: sections, severities, statuses, outcomes, results and the
//! derived run summary.

pub mod field_value;
pub mod outcome;
pub mod result;
pub mod section;
pub mod summary;

pub use field_value::FieldValue;
pub use outcome::{CoverageBands, NoDataPolicy, Outcome, PrerequisitePolicy};
pub use result::{CheckResult, CheckStatus, Severity};
pub use section::Section;
pub use summary::{RunSummary, SectionStats};

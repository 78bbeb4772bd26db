//! Recorder errors.

use super::error_code::{self, ReelErrorCode};

/// Errors raised when a result would break the one-result-per-id invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("Check {check_id} was already recorded")]
    DuplicateCheckId { check_id: String },

    #[error("Check {check_id} is outside the declared range of section {section}")]
    Undeclared { check_id: String, section: String },
}

impl ReelErrorCode for RecordError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCheckId { .. } => error_code::DUPLICATE_CHECK,
            Self::Undeclared { .. } => error_code::UNDECLARED_CHECK,
        }
    }
}

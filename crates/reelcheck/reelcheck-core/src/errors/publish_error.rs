//! Publishing errors.

use super::error_code::{self, ReelErrorCode};

/// Errors that can occur while persisting a run.
///
/// The publisher logs these and reports them in its outcome; they never
/// abort the process.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Run record was not created (status {status}): {reason}")]
    RunNotCreated { status: u16, reason: String },

    #[error("Result batch {batch} failed (status {status}): {reason}")]
    BatchFailed {
        batch: usize,
        status: u16,
        reason: String,
    },

    #[error("Fallback artifact could not be written to {path}: {reason}")]
    FallbackFailed { path: String, reason: String },
}

impl ReelErrorCode for PublishError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FallbackFailed { .. } => error_code::FALLBACK_FAILED,
            _ => error_code::PUBLISH_FAILED,
        }
    }
}

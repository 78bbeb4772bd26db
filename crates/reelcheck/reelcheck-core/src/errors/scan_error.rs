//! Source scanner errors.

use std::path::PathBuf;

use super::error_code::{self, ReelErrorCode};

/// Errors surfaced by the source text scanner.
///
/// Unreadable files are skipped silently and never produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Source root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Invalid search pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ReelErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => error_code::INVALID_PATTERN,
            Self::RootNotFound { .. } => error_code::SCAN_ERROR,
        }
    }
}

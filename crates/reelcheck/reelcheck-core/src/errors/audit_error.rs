//! Top-level errors for an audit invocation.

use super::{ConfigError, PublishError, RecordError, ReelErrorCode, ScanError};

/// Errors that can stop an invocation before or around the run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

impl ReelErrorCode for AuditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::Record(e) => e.error_code(),
            Self::Publish(e) => e.error_code(),
        }
    }
}

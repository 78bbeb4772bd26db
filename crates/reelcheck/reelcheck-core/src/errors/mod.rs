//! Error handling for reelcheck.
//! One error enum per subsystem, `thiserror` only.
//!
//! Checks never return these: every failure inside a check is converted into
//! a [`CheckStatus`](crate::model::CheckStatus). These errors cover the
//! surrounding machinery (config loading, scanning, recording, publishing).

pub mod audit_error;
pub mod config_error;
pub mod error_code;
pub mod publish_error;
pub mod record_error;
pub mod scan_error;

pub use audit_error::AuditError;
pub use config_error::ConfigError;
pub use error_code::ReelErrorCode;
pub use publish_error::PublishError;
pub use record_error::RecordError;
pub use scan_error::ScanError;

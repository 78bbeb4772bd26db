//! ReelErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a stable code string that
/// survives message rewording (used in logs and the fallback artifact).
pub trait ReelErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const INVALID_PATTERN: &str = "INVALID_PATTERN";
pub const DUPLICATE_CHECK: &str = "DUPLICATE_CHECK";
pub const UNDECLARED_CHECK: &str = "UNDECLARED_CHECK";
pub const PUBLISH_FAILED: &str = "PUBLISH_FAILED";
pub const FALLBACK_FAILED: &str = "FALLBACK_FAILED";

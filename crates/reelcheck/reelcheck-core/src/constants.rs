//! Shared constants for the reelcheck audit runner.

/// reelcheck version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for remote queries and web probes, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// REST path prefix under the remote base URL.
pub const DEFAULT_REST_PATH: &str = "/rest/v1";

/// Default number of result rows per publish request.
pub const DEFAULT_PUBLISH_BATCH_SIZE: usize = 50;

/// Default table holding one row per run.
pub const DEFAULT_RUNS_TABLE: &str = "audit_runs";

/// Default table holding one row per check result.
pub const DEFAULT_RESULTS_TABLE: &str = "audit_results";

/// Default directory for the local fallback artifact.
pub const DEFAULT_FALLBACK_DIR: &str = "reelcheck-fallback";

/// Default trigger type recorded on the run summary.
pub const DEFAULT_TRIGGER_TYPE: &str = "manual";

/// Default per-section skip-rate ceiling (fraction of checks).
pub const DEFAULT_SKIP_THRESHOLD: f64 = 0.30;

/// Coverage at or above this percentage passes.
pub const DEFAULT_COVERAGE_PASS_PCT: f64 = 95.0;

/// Coverage at or above this percentage (and below the pass band) warns.
pub const DEFAULT_COVERAGE_WARN_PCT: f64 = 80.0;

/// Upper bound on rows fetched by sampled structural checks.
pub const MAX_SAMPLE_ROWS: usize = 200;

/// Share of reference items that must satisfy a spot-check property.
pub const DEFAULT_SPOT_CHECK_RATIO: f64 = 0.70;

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "reelcheck.toml";

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "REELCHECK_LOG";

/// Fallback log filter when `REELCHECK_LOG` is absent or invalid.
pub const DEFAULT_LOG_FILTER: &str = "reelcheck=info";

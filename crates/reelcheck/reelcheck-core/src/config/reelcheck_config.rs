//! Top-level reelcheck configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{GovernanceConfig, PublishConfig, RemoteConfig, RunConfig, SourceConfig, WebConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;
use crate::model::Section;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`REELCHECK_*`)
/// 3. Project config (`reelcheck.toml` in the project dir, or `--config`)
/// 4. User config (`~/.reelcheck/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReelcheckConfig {
    pub remote: RemoteConfig,
    pub web: WebConfig,
    pub source: SourceConfig,
    pub publish: PublishConfig,
    pub governance: GovernanceConfig,
    pub run: RunConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file, replacing the project-config lookup.
    pub config_file: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
    pub site_url: Option<String>,
    pub trigger_type: Option<String>,
    pub publish_enabled: Option<bool>,
    pub sections: Vec<String>,
}

/// Environment variables read by `apply_env_overrides`.
pub const ENV_VARS: &[&str] = &[
    "REELCHECK_REMOTE_URL",
    "REELCHECK_SERVICE_KEY",
    "REELCHECK_ANON_KEY",
    "REELCHECK_TIMEOUT_SECS",
    "REELCHECK_SITE_URL",
    "REELCHECK_SOURCE_ROOT",
    "REELCHECK_IOS_ROOT",
    "REELCHECK_PUBLISH_ENABLED",
    "REELCHECK_PUBLISH_BATCH_SIZE",
    "REELCHECK_FALLBACK_DIR",
    "REELCHECK_TRIGGER",
];

impl ReelcheckConfig {
    /// Load configuration with layered resolution rooted at `project_dir`.
    pub fn load(project_dir: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config, or the explicit file from the CLI
        match cli_overrides.and_then(|c| c.config_file.as_deref()) {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, explicit)?;
            }
            None => {
                let project_config_path = project_dir.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ReelcheckConfig) -> Result<(), ConfigError> {
        let gov = &config.governance;
        if let Some(v) = gov.default_skip_threshold {
            check_fraction("governance.default_skip_threshold", v)?;
        }
        for (name, v) in &gov.skip_thresholds {
            if name.parse::<Section>().is_err() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("governance.skip_thresholds.{name}"),
                    message: "unknown section".to_string(),
                });
            }
            check_fraction(&format!("governance.skip_thresholds.{name}"), *v)?;
        }
        if let Some(v) = gov.spot_check_ratio {
            check_fraction("governance.spot_check_ratio", v)?;
        }
        let bands = gov.coverage_bands();
        if !(0.0..=100.0).contains(&bands.pass_pct) || !(0.0..=100.0).contains(&bands.warn_pct) {
            return Err(ConfigError::ValidationFailed {
                field: "governance.coverage_pass_pct".to_string(),
                message: "coverage bands must be between 0 and 100".to_string(),
            });
        }
        if bands.warn_pct > bands.pass_pct {
            return Err(ConfigError::ValidationFailed {
                field: "governance.coverage_warn_pct".to_string(),
                message: "must not exceed coverage_pass_pct".to_string(),
            });
        }
        if config.publish.batch_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "publish.batch_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.remote.timeout_secs == Some(0) || config.web.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for name in &config.run.sections {
            if name.parse::<Section>().is_err() {
                return Err(ConfigError::ValidationFailed {
                    field: "run.sections".to_string(),
                    message: format!("unknown section: {name}"),
                });
            }
        }
        Ok(())
    }

    /// Sections selected for this run, in fixed execution order.
    pub fn selected_sections(&self) -> Vec<Section> {
        Section::all()
            .iter()
            .copied()
            .filter(|s| {
                self.run.sections.is_empty() || self.run.sections.iter().any(|n| n == s.as_str())
            })
            .collect()
    }

    /// Returns the user config path: `~/.reelcheck/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".reelcheck").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ReelcheckConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ReelcheckConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut ReelcheckConfig, other: &ReelcheckConfig) {
        // Remote
        merge_opt(&mut base.remote.base_url, &other.remote.base_url);
        merge_opt(&mut base.remote.rest_path, &other.remote.rest_path);
        merge_opt(&mut base.remote.service_key, &other.remote.service_key);
        merge_opt(&mut base.remote.anon_key, &other.remote.anon_key);
        merge_opt(&mut base.remote.timeout_secs, &other.remote.timeout_secs);

        // Web
        merge_opt(&mut base.web.site_url, &other.web.site_url);
        merge_opt(&mut base.web.token, &other.web.token);
        merge_opt(&mut base.web.timeout_secs, &other.web.timeout_secs);

        // Source
        merge_opt(&mut base.source.root, &other.source.root);
        merge_opt(&mut base.source.ios_root, &other.source.ios_root);

        // Publish
        merge_opt(&mut base.publish.enabled, &other.publish.enabled);
        merge_opt(&mut base.publish.batch_size, &other.publish.batch_size);
        merge_opt(&mut base.publish.runs_table, &other.publish.runs_table);
        merge_opt(&mut base.publish.results_table, &other.publish.results_table);
        merge_opt(&mut base.publish.fallback_dir, &other.publish.fallback_dir);

        // Governance
        let (bg, og) = (&mut base.governance, &other.governance);
        merge_opt(&mut bg.default_skip_threshold, &og.default_skip_threshold);
        if !og.skip_thresholds.is_empty() {
            bg.skip_thresholds
                .extend(og.skip_thresholds.iter().map(|(k, v)| (k.clone(), *v)));
        }
        merge_opt(&mut bg.prerequisite_policy, &og.prerequisite_policy);
        merge_opt(&mut bg.no_data_policy, &og.no_data_policy);
        merge_opt(&mut bg.coverage_pass_pct, &og.coverage_pass_pct);
        merge_opt(&mut bg.coverage_warn_pct, &og.coverage_warn_pct);
        merge_opt(&mut bg.spot_check_ratio, &og.spot_check_ratio);

        // Run
        merge_opt(&mut base.run.trigger_type, &other.run.trigger_type);
        if !other.run.sections.is_empty() {
            base.run.sections = other.run.sections.clone();
        }
    }

    /// Apply environment variable overrides (see [`ENV_VARS`]).
    /// Unparseable numeric or boolean values are ignored.
    fn apply_env_overrides(config: &mut ReelcheckConfig) {
        if let Ok(val) = std::env::var("REELCHECK_REMOTE_URL") {
            config.remote.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("REELCHECK_SERVICE_KEY") {
            config.remote.service_key = Some(val);
        }
        if let Ok(val) = std::env::var("REELCHECK_ANON_KEY") {
            config.remote.anon_key = Some(val);
        }
        if let Ok(val) = std::env::var("REELCHECK_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.remote.timeout_secs = Some(v);
                config.web.timeout_secs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REELCHECK_SITE_URL") {
            config.web.site_url = Some(val);
        }
        if let Ok(val) = std::env::var("REELCHECK_SOURCE_ROOT") {
            config.source.root = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("REELCHECK_IOS_ROOT") {
            config.source.ios_root = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("REELCHECK_PUBLISH_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.publish.enabled = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REELCHECK_PUBLISH_BATCH_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.publish.batch_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REELCHECK_FALLBACK_DIR") {
            config.publish.fallback_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("REELCHECK_TRIGGER") {
            config.run.trigger_type = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ReelcheckConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.source_root {
            config.source.root = Some(v.clone());
        }
        if let Some(ref v) = cli.site_url {
            config.web.site_url = Some(v.clone());
        }
        if let Some(ref v) = cli.trigger_type {
            config.run.trigger_type = Some(v.clone());
        }
        if let Some(v) = cli.publish_enabled {
            config.publish.enabled = Some(v);
        }
        if !cli.sections.is_empty() {
            config.run.sections = cli.sections.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn merge_opt<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
    if other.is_some() {
        base.clone_from(other);
    }
}

fn check_fraction(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be between 0.0 and 1.0".to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

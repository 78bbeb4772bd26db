//! # reelcheck-cli
//!
//! Argument parsing and the single-shot run: load config, build the
//! clients, run the selected sections, publish, print the report and return
//! the exit code.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use reelcheck_audit::reporters::create_reporter;
use reelcheck_audit::{AuditContext, AuditController, Publisher};
use reelcheck_core::config::{CliOverrides, ReelcheckConfig};
use reelcheck_core::errors::{AuditError, ConfigError, ReelErrorCode};
use reelcheck_core::tracing::{init_tracing, LogFormat};
use reelcheck_sources::remote::RemoteClientConfig;
use reelcheck_sources::{DataSource, HttpProbe, RemoteClient, SourceTree, Unconfigured};

/// Exit code when the run could not start.
pub const EXIT_CONFIG_ERROR: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "reelcheck",
    version,
    about = "Audit data quality, backend configuration and source invariants"
)]
pub struct Cli {
    /// Directory searched for reelcheck.toml
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
    /// Explicit config file, replacing the project lookup
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Root of the product source tree
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,
    /// Public site URL probed by web checks
    #[arg(long, value_name = "URL")]
    pub site_url: Option<String>,
    /// Provenance recorded on the run (e.g. cron, manual)
    #[arg(long)]
    pub trigger: Option<String>,
    /// Skip publishing; the report is still printed
    #[arg(long)]
    pub no_publish: bool,
    /// Report format
    #[arg(long, default_value = "console", value_parser = ["console", "json"])]
    pub format: String,
    /// Run only these sections (repeatable); order stays fixed
    #[arg(long = "section", value_name = "NAME")]
    pub sections: Vec<String>,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_file: self.config.clone(),
            source_root: self.source_root.clone(),
            site_url: self.site_url.clone(),
            trigger_type: self.trigger.clone(),
            publish_enabled: self.no_publish.then_some(false),
            sections: self.sections.clone(),
        }
    }

    pub fn log_format(&self) -> LogFormat {
        if self.format == "json" {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Run one audit. Returns the process exit code; errors mean the run never
/// started.
pub fn run(cli: &Cli) -> Result<u8, AuditError> {
    init_tracing(cli.log_format());

    let config = ReelcheckConfig::load(&cli.project_dir, Some(&cli.overrides()))?;
    let reporter = create_reporter(&cli.format).ok_or_else(|| ConfigError::ValidationFailed {
        field: "format".to_string(),
        message: format!("unknown report format: {}", cli.format),
    })?;

    let remote: Box<dyn DataSource> = match RemoteClientConfig::from_config(&config.remote) {
        Some(remote_config) => Box::new(RemoteClient::new(remote_config)),
        None => {
            tracing::warn!("remote data service not configured; remote checks will skip");
            Box::new(Unconfigured)
        }
    };
    let web = HttpProbe::new(config.web.effective_timeout(), config.web.token.clone());
    let source = open_tree(config.source.root.as_deref());
    let ios = open_tree(config.source.effective_ios_root());

    let ctx = AuditContext {
        remote: remote.as_ref(),
        web: &web,
        source: source.as_ref(),
        ios: ios.as_ref(),
        config: &config,
    };

    let controller = AuditController::new().filtered(&config.selected_sections());
    let show_progress = cli.format == "console";
    let report = controller.run_with_progress(&ctx, |section, stats| {
        if show_progress {
            println!("▸ {:<18} {}/{} passed", section.as_str(), stats.passed, stats.total);
        }
    });

    if config.publish.effective_enabled() {
        let outcome = Publisher::new(remote.as_ref(), &config.publish)
            .publish(&report.summary, &report.results);
        match (&outcome.run_id, &outcome.fallback_path) {
            (Some(run_id), _) => tracing::info!(
                run_id = %run_id,
                results_written = outcome.results_written,
                batches_failed = outcome.batches_failed,
                "run published"
            ),
            (None, Some(path)) => {
                tracing::warn!(path = %path.display(), "run not published; fallback written")
            }
            (None, None) => tracing::error!(
                errors = ?outcome.errors,
                "run neither published nor written to fallback"
            ),
        }
    } else {
        tracing::info!("publishing disabled");
    }

    match reporter.generate(&report) {
        Ok(text) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{text}") {
                tracing::error!(error = %e, "failed to write report");
            }
        }
        Err(e) => tracing::error!(reporter = reporter.name(), error = %e, "report generation failed"),
    }

    for rejected in &report.rejected {
        tracing::warn!(%rejected, "duplicate result rejected");
    }

    Ok(if report.exit_code() == 0 { 0 } else { 1 })
}

/// Open a source tree, logging (not failing) when the root is unusable.
fn open_tree(root: Option<&Path>) -> Option<SourceTree> {
    let root = root?;
    match SourceTree::open(root) {
        Ok(tree) => Some(tree),
        Err(e) => {
            tracing::warn!(code = e.error_code(), error = %e, "source tree unavailable; dependent checks will skip");
            None
        }
    }
}

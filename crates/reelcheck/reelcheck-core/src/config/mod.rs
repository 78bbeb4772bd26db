//! Configuration system for reelcheck.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod governance_config;
pub mod publish_config;
pub mod reelcheck_config;
pub mod remote_config;
pub mod run_config;
pub mod source_config;
pub mod web_config;

pub use governance_config::GovernanceConfig;
pub use publish_config::PublishConfig;
pub use reelcheck_config::{CliOverrides, ReelcheckConfig};
pub use remote_config::RemoteConfig;
pub use run_config::RunConfig;
pub use source_config::SourceConfig;
pub use web_config::WebConfig;

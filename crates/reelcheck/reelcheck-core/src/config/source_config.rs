//! Local source tree configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the product's web/app source tree.
    pub root: Option<PathBuf>,
    /// Root of the iOS project. Default: `root`.
    pub ios_root: Option<PathBuf>,
}

impl SourceConfig {
    pub fn effective_ios_root(&self) -> Option<&Path> {
        self.ios_root.as_deref().or(self.root.as_deref())
    }
}

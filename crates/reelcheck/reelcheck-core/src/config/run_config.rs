//! Per-invocation run settings.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TRIGGER_TYPE;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunConfig {
    /// Provenance recorded on the summary ("cron", "manual", ...).
    pub trigger_type: Option<String>,
    /// Restrict the run to these sections. Empty: all sections.
    #[serde(default)]
    pub sections: Vec<String>,
}

impl RunConfig {
    pub fn effective_trigger_type(&self) -> &str {
        self.trigger_type.as_deref().unwrap_or(DEFAULT_TRIGGER_TYPE)
    }
}

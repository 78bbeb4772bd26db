//! Section identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The ten audit sections, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    DataIntegrity,
    EngineInvariants,
    UserExperience,
    Compliance,
    Website,
    Backend,
    IosBuild,
    Marketing,
    Retention,
    Security,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataIntegrity => "data_integrity",
            Self::EngineInvariants => "engine_invariants",
            Self::UserExperience => "user_experience",
            Self::Compliance => "compliance",
            Self::Website => "website",
            Self::Backend => "backend",
            Self::IosBuild => "ios_build",
            Self::Marketing => "marketing",
            Self::Retention => "retention",
            Self::Security => "security",
        }
    }

    /// Single-letter prefix used to build check ids (`D1`, `S4`, ...).
    pub fn prefix(&self) -> char {
        match self {
            Self::DataIntegrity => 'D',
            Self::EngineInvariants => 'E',
            Self::UserExperience => 'U',
            Self::Compliance => 'C',
            Self::Website => 'W',
            Self::Backend => 'B',
            Self::IosBuild => 'I',
            Self::Marketing => 'M',
            Self::Retention => 'R',
            Self::Security => 'S',
        }
    }

    /// Builds the check id for an ordinal within this section.
    pub fn check_id(&self, ordinal: u32) -> String {
        format!("{}{}", self.prefix(), ordinal)
    }

    /// All sections in their fixed execution order.
    pub fn all() -> &'static [Section] {
        &[
            Self::DataIntegrity,
            Self::EngineInvariants,
            Self::UserExperience,
            Self::Compliance,
            Self::Website,
            Self::Backend,
            Self::IosBuild,
            Self::Marketing,
            Self::Retention,
            Self::Security,
        ]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown section: {s}"))
    }
}

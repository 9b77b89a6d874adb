//! Verbosity level and warnings flag applied process-wide.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// Amount of run-time status output. Ordered `None < Essential < Detailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerboseLevel {
    None,
    Essential,
    Detailed,
}

impl VerboseLevel {
    /// Spelling used in parameter files.
    pub fn as_str(self) -> &'static str {
        match self {
            VerboseLevel::None => "NONE",
            VerboseLevel::Essential => "ESSENTIAL",
            VerboseLevel::Detailed => "DETAILED",
        }
    }
}

/// Exact, case-sensitive match on the parameter-file spelling.
impl FromStr for VerboseLevel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NONE" => Ok(VerboseLevel::None),
            "ESSENTIAL" => Ok(VerboseLevel::Essential),
            "DETAILED" => Ok(VerboseLevel::Detailed),
            other => Err(Error::UnknownVerboseLevel {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for VerboseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerboseLevel::None => "none",
            VerboseLevel::Essential => "essential",
            VerboseLevel::Detailed => "detailed",
        };
        f.write_str(label)
    }
}

/// Level and warnings flag, read by every reporting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verbosity {
    pub level: VerboseLevel,
    pub warnings: bool,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self {
            level: VerboseLevel::Detailed,
            warnings: true,
        }
    }
}

impl Verbosity {
    /// Whether output tagged with `level` should be emitted.
    pub fn allows(&self, level: VerboseLevel) -> bool {
        level != VerboseLevel::None && level <= self.level
    }

    /// Whether warnings are emitted at all.
    pub fn shows_warnings(&self) -> bool {
        self.warnings && self.level > VerboseLevel::None
    }
}

//! What registration does when a route cannot be documented.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reaction to a document emission failure during build.
///
/// Engine registration failures always abort, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the build and return the error.
    #[default]
    Abort,
    /// Log the failure, leave the route out of the document and still
    /// register it with the engine.
    Degrade,
}

impl FailurePolicy {
    /// Lowercase name as used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Degrade => "degrade",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "degrade" => Ok(Self::Degrade),
            other => Err(format!("unknown failure policy '{other}', expected 'abort' or 'degrade'")),
        }
    }
}

//! Severity scale shared by jobs and heuristic results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// How problematic a job's resource usage or configuration is.
///
/// Stored as its ordinal value; higher is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    None = 0,
    Low = 1,
    Moderate = 2,
    Severe = 3,
    Critical = 4,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::None,
        Severity::Low,
        Severity::Moderate,
        Severity::Severe,
        Severity::Critical,
    ];

    /// Ordinal value as stored in the database.
    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Critical => "Critical",
        }
    }
}

impl TryFrom<i32> for Severity {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.value() == value)
            .ok_or_else(|| Error::InvalidSeverity(value.to_string()))
    }
}

/// Accepts either the ordinal value (`"3"`) or the name (`"severe"`).
impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i32>() {
            return Severity::try_from(value);
        }
        Severity::ALL
            .into_iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidSeverity(s.to_string()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

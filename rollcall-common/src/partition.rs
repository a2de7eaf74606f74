//! Roster partitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Named bucket of person records
///
/// The two partitions are independent collections with independent counts.
/// The wire and storage name is the lowercase `as_str()` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Guest,
    Team,
}

impl Partition {
    /// Both partitions in roster order (guests first)
    pub const ALL: [Partition; 2] = [Partition::Guest, Partition::Team];

    /// Storage / URL name
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Guest => "guest",
            Partition::Team => "team",
        }
    }

    /// Human label used in event log status text
    pub fn label(&self) -> &'static str {
        match self {
            Partition::Guest => "Guests",
            Partition::Team => "Team",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" | "guests" => Ok(Partition::Guest),
            "team" => Ok(Partition::Team),
            other => Err(Error::InvalidInput(format!("Unknown partition: {}", other))),
        }
    }
}

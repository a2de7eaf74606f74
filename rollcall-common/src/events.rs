//! Status transitions and the append-only event log

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::partition::Partition;

/// A status transition produced by a roster toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Arrived,
    Left,
    Evacuated,
    EvacuationCleared,
}

impl StatusChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusChange::Arrived => "arrived",
            StatusChange::Left => "left",
            StatusChange::Evacuated => "evacuated",
            StatusChange::EvacuationCleared => "evacuation cleared",
        }
    }

    /// Status text stored in the event log, e.g. "Guests arrived"
    pub fn status_text(&self, partition: Partition) -> String {
        format!("{} {}", partition.label(), self.as_str())
    }
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the event log
///
/// Entries are never mutated; the log only grows, except on a full reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// Local wall clock, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub full_name: String,
    pub group: String,
    pub status_text: String,
}

impl EventLogEntry {
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {} ({}) {}",
            self.timestamp, self.full_name, self.group, self.status_text
        )
    }
}

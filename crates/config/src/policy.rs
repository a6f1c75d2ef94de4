#![forbid(unsafe_code)]

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Backup schedule and retention of one virtual machine.
///
/// A machine without a policy is never snapshotted nor reaped.
#[serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupPolicy {
    /// Days between two automatic snapshots.
    #[serde(alias = "snapshotInterval")]
    pub interval_days: u32,

    /// Weekday of the very first automatic snapshot. Accepts full and
    /// abbreviated names in any case.
    #[serde(alias = "snapshotStartDay")]
    #[serde_as(as = "DisplayFromStr")]
    pub start_day: Weekday,

    /// Age in days after which an automatic snapshot is deleted.
    #[serde(alias = "deleteSnapshotsOlderThan")]
    pub retention_days: u32,
}

impl BackupPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if self.interval_days == 0 {
            return Err("interval_days must be at least 1".into());
        }
        Ok(())
    }
}

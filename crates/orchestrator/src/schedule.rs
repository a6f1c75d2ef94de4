//! Decides whether a machine needs a new round of snapshots.
//!
//! All comparisons are on local calendar dates: a snapshot taken late in the
//! evening counts for that whole day.

#![forbid(unsafe_code)]

use crate::matcher::belongs_to_disk;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, Utc};
use cloudapi::{SnapshotRecord, VirtualDisk, VirtualMachine};
use config::BackupPolicy;

/// Latest snapshots found for one disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskHistory {
    /// Latest snapshot of any origin.
    pub last_any: Option<DateTime<Utc>>,
    /// Latest snapshot made by this tool.
    pub last_auto: Option<DateTime<Utc>>,
}

impl DiskHistory {
    pub fn collect(vm: &VirtualMachine, disk: &VirtualDisk, snapshots: &[SnapshotRecord]) -> Self {
        let mut history = Self::default();
        for snapshot in snapshots.iter().filter(|s| belongs_to_disk(s, vm, disk)) {
            history.last_any = history.last_any.max(Some(snapshot.created_at));
            if snapshot.auto_script_created {
                history.last_auto = history.last_auto.max(Some(snapshot.created_at));
            }
        }
        history
    }
}

/// Outcome of [`evaluate`], kept for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub last_any: Option<NaiveDateTime>,
    pub last_auto: Option<NaiveDateTime>,
    pub next_due: Option<NaiveDate>,
    pub due: bool,
}

/// Wall-clock time of `at` in the local zone.
pub fn local(at: DateTime<Utc>) -> NaiveDateTime {
    at.with_timezone(&Local).naive_local()
}

/// The backup age of a machine is the age of its worst-covered disk. A disk
/// without any snapshot makes the whole machine "never backed up" (`None`).
pub fn last_backup<T: Ord + Copy>(per_disk: &[Option<T>]) -> Option<T> {
    per_disk
        .iter()
        .copied()
        .collect::<Option<Vec<T>>>()?
        .into_iter()
        .min()
}

/// First date on which a machine last backed up at `last` is due again.
pub fn next_due(policy: &BackupPolicy, last: NaiveDateTime) -> Option<NaiveDate> {
    last.date()
        .checked_add_days(Days::new(u64::from(policy.interval_days)))
}

/// Whether a machine whose disks were last auto-snapshotted at
/// `last_auto_per_disk` is due at `now`.
///
/// A machine never snapshotted by this tool starts on the policy's weekday.
/// Otherwise it is due once `interval_days` calendar days have passed since
/// its oldest disk backup. A machine without disks is never due.
pub fn is_due(
    policy: &BackupPolicy,
    last_auto_per_disk: &[Option<NaiveDateTime>],
    now: NaiveDateTime,
) -> bool {
    if last_auto_per_disk.is_empty() {
        return false;
    }
    match last_backup(last_auto_per_disk) {
        None => now.weekday() == policy.start_day,
        Some(last) => next_due(policy, last).is_some_and(|due| now.date() >= due),
    }
}

/// Look up the snapshot history of every disk of `vm` and decide.
pub fn evaluate(
    policy: &BackupPolicy,
    vm: &VirtualMachine,
    disks: &[VirtualDisk],
    snapshots: &[SnapshotRecord],
    now: DateTime<Local>,
) -> Evaluation {
    let histories: Vec<_> = disks
        .iter()
        .map(|disk| DiskHistory::collect(vm, disk, snapshots))
        .collect();
    let last_any: Vec<_> = histories.iter().map(|h| h.last_any.map(local)).collect();
    let last_auto: Vec<_> = histories.iter().map(|h| h.last_auto.map(local)).collect();

    let last_auto_backup = last_backup(&last_auto);
    Evaluation {
        last_any: last_backup(&last_any),
        last_auto: last_auto_backup,
        next_due: last_auto_backup.and_then(|last| next_due(policy, last)),
        due: is_due(policy, &last_auto, now.naive_local()),
    }
}

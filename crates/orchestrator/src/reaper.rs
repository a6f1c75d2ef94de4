//! Deletes automatic snapshots that outlived their machine's retention.

#![forbid(unsafe_code)]

use crate::matcher::find_owner;
use chrono::{DateTime, Days, Utc};
use cloudapi::{CloudApi, SnapshotRecord, VirtualMachine};
use config::BackupPolicy;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Decision for one snapshot before anything is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No machine name occurs in the snapshot name.
    Unmatched,
    /// The owning machine has no policy.
    Unconfigured { vm_name: String },
    /// Too young, or not made by this tool (`deletion_due` is `None`).
    Keep {
        vm_name: String,
        deletion_due: Option<DateTime<Utc>>,
    },
    Delete { vm_name: String },
}

/// What happened to one snapshot.
#[derive(Debug)]
pub enum Outcome {
    Unmatched,
    Unconfigured { vm_name: String },
    Kept { deletion_due: Option<DateTime<Utc>> },
    Deleted,
    /// Due, but the run was a dry run.
    WouldDelete,
    DeleteFailed(cloudapi::Error),
}

#[derive(Debug)]
pub struct ReapOutcome {
    pub snapshot: SnapshotRecord,
    pub outcome: Outcome,
}

/// Instant at which an automatic snapshot becomes deletable.
pub fn deletion_due(snapshot: &SnapshotRecord, policy: &BackupPolicy) -> Option<DateTime<Utc>> {
    snapshot
        .created_at
        .checked_add_days(Days::new(u64::from(policy.retention_days)))
}

pub fn evaluate(
    snapshot: &SnapshotRecord,
    vms: &[VirtualMachine],
    policies: &BTreeMap<String, BackupPolicy>,
    now: DateTime<Utc>,
) -> Verdict {
    let Some(vm) = find_owner(snapshot, vms) else {
        return Verdict::Unmatched;
    };
    let vm_name = vm.name.clone();
    let Some(policy) = policies.get(&vm.name) else {
        return Verdict::Unconfigured { vm_name };
    };
    if !snapshot.auto_script_created {
        return Verdict::Keep {
            vm_name,
            deletion_due: None,
        };
    }
    match deletion_due(snapshot, policy) {
        Some(due) if now >= due => Verdict::Delete { vm_name },
        due => Verdict::Keep {
            vm_name,
            deletion_due: due,
        },
    }
}

/// Evaluate every snapshot and delete the ones that are due. A failed
/// deletion is recorded and the remaining snapshots are still processed.
pub async fn reap(
    api: &dyn CloudApi,
    snapshots: Vec<SnapshotRecord>,
    vms: &[VirtualMachine],
    policies: &BTreeMap<String, BackupPolicy>,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Vec<ReapOutcome> {
    let mut outcomes = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let outcome = match evaluate(&snapshot, vms, policies, now) {
            Verdict::Unmatched => Outcome::Unmatched,
            Verdict::Unconfigured { vm_name } => Outcome::Unconfigured { vm_name },
            Verdict::Keep { deletion_due, .. } => Outcome::Kept { deletion_due },
            Verdict::Delete { .. } if dry_run => Outcome::WouldDelete,
            Verdict::Delete { vm_name } => match api.delete_snapshot(&snapshot.id).await {
                Ok(()) => {
                    info!(vm = %vm_name, snapshot = %snapshot.name, id = %snapshot.id, "snapshot deleted");
                    Outcome::Deleted
                }
                Err(err) => {
                    warn!(vm = %vm_name, snapshot = %snapshot.name, id = %snapshot.id, %err, "snapshot deletion failed");
                    Outcome::DeleteFailed(err)
                }
            },
        };
        outcomes.push(ReapOutcome { snapshot, outcome });
    }
    outcomes
}

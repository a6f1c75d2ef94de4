//! Brings the pending state in line with what the cloud reports and finds
//! the machines whose snapshots all just completed.

#![forbid(unsafe_code)]

use crate::domain::{AVAILABLE, PendingState};
use chrono::{DateTime, Utc};
use cloudapi::{SnapshotRecord, VirtualMachine};
use std::collections::HashMap;

/// What reconciliation found for one tracked machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmReconciliation {
    pub vm_id: String,
    /// `None` when the machine is no longer listed by the API.
    pub vm_name: Option<String>,
    /// At least one tracked status changed during this run.
    pub changed: bool,
    /// Every tracked snapshot is available. Never true without snapshots.
    pub complete: bool,
    /// Tracked snapshots and their status after this run.
    pub statuses: Vec<(String, String)>,
    /// Creation times of the available snapshots still listed by the API.
    pub completed_at: Vec<DateTime<Utc>>,
}

impl VmReconciliation {
    /// Completion was reached during this run, so the operator has to hear
    /// about it now and never again.
    pub fn should_notify(&self) -> bool {
        self.complete && self.changed
    }

    pub fn display_name(&self) -> &str {
        self.vm_name.as_deref().unwrap_or(&self.vm_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub state: PendingState,
    pub vms: Vec<VmReconciliation>,
}

/// Update every tracked status from `live` and report per machine.
///
/// Snapshots missing from `live` keep their stored status.
pub fn reconcile(
    mut state: PendingState,
    live: &HashMap<String, SnapshotRecord>,
    vms: &HashMap<String, VirtualMachine>,
) -> Reconciliation {
    let mut report = Vec::new();

    for vm_id in state.vm_ids() {
        let tracked: Vec<String> = state
            .snapshots(&vm_id)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default();

        let mut changed = false;
        for snapshot_id in &tracked {
            if let Some(record) = live.get(snapshot_id) {
                changed |= state.set_status(&vm_id, snapshot_id, &record.state);
            }
        }

        let statuses: Vec<(String, String)> = state
            .snapshots(&vm_id)
            .map(|s| s.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        let complete = !statuses.is_empty() && statuses.iter().all(|(_, s)| s == AVAILABLE);
        let completed_at = statuses
            .iter()
            .filter(|(_, status)| status == AVAILABLE)
            .filter_map(|(id, _)| live.get(id).map(|r| r.created_at))
            .collect();

        report.push(VmReconciliation {
            vm_name: vms.get(&vm_id).map(|vm| vm.name.clone()),
            vm_id,
            changed,
            complete,
            statuses,
            completed_at,
        });
    }

    Reconciliation { state, vms: report }
}

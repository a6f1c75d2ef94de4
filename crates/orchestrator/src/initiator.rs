#![forbid(unsafe_code)]

use crate::domain::{PendingState, snapshot_request};
use chrono::{DateTime, Local};
use cloudapi::{CloudApi, DataCenter, VirtualDisk, VirtualMachine};
use tracing::{info, warn};

/// Result of asking for one disk's snapshot.
#[derive(Debug)]
pub struct DiskOutcome {
    pub disk: VirtualDisk,
    pub snapshot_name: String,
    /// Id of the requested snapshot, or why the request failed.
    pub result: Result<String, cloudapi::Error>,
}

/// Request a snapshot of every disk of a due machine and track each accepted
/// request as `initiated` in `state`. A failing disk does not stop the others.
///
/// Once at least one request was accepted, the accepted ids replace whatever
/// was still tracked for the machine from earlier cycles.
pub async fn create_snapshots_for_due_vm(
    api: &dyn CloudApi,
    data_center: &DataCenter,
    vm: &VirtualMachine,
    disks: &[VirtualDisk],
    now: DateTime<Local>,
    state: &mut PendingState,
) -> Vec<DiskOutcome> {
    let mut outcomes = Vec::with_capacity(disks.len());
    let mut accepted = Vec::new();
    for disk in disks {
        let request = snapshot_request(data_center, vm, disk, &now);
        let result = api.create_snapshot(data_center, disk, &request).await;
        match &result {
            Ok(snapshot_id) => {
                info!(vm = %vm.name, disk = %disk.name, %snapshot_id, "snapshot requested");
                accepted.push(snapshot_id.clone());
            }
            Err(err) => {
                warn!(vm = %vm.name, disk = %disk.name, %err, "snapshot request failed");
            }
        }
        outcomes.push(DiskOutcome {
            disk: disk.clone(),
            snapshot_name: request.name,
            result,
        });
    }

    if accepted.is_empty() {
        return outcomes;
    }
    if let Some(stale) = state.clear_vm(&vm.id) {
        info!(vm = %vm.name, dropped = stale.len(), "replacing entries of an earlier cycle");
    }
    for snapshot_id in accepted {
        state.track(vm.id.clone(), snapshot_id);
    }
    outcomes
}

//! Best-effort correlation of snapshots to the machines and disks that
//! produced them.
//!
//! The API has no link from a snapshot back to its volume or server, so the
//! owner is guessed from the snapshot name. When one machine name contains
//! another (`web1` and `web10`), the first machine in input order wins.
//! Callers must treat the result as a hint, not as an identity.

#![forbid(unsafe_code)]

use cloudapi::{SnapshotRecord, VirtualDisk, VirtualMachine};

/// First machine, in input order, whose name occurs in the snapshot name.
pub fn find_owner<'a>(
    snapshot: &SnapshotRecord,
    vms: &'a [VirtualMachine],
) -> Option<&'a VirtualMachine> {
    vms.iter()
        .find(|vm| !vm.name.is_empty() && snapshot.name.contains(vm.name.as_str()))
}

/// Whether the snapshot name mentions both the machine and the disk.
pub fn belongs_to_disk(snapshot: &SnapshotRecord, vm: &VirtualMachine, disk: &VirtualDisk) -> bool {
    !vm.name.is_empty()
        && !disk.name.is_empty()
        && snapshot.name.contains(vm.name.as_str())
        && snapshot.name.contains(disk.name.as_str())
}

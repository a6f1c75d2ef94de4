#![forbid(unsafe_code)]

use chrono::{DateTime, Datelike, TimeZone};
use cloudapi::{AUTO_SCRIPT_MARKER, DataCenter, SnapshotRequest, VirtualDisk, VirtualMachine};

/// `{vm}_{disk}_KW{iso year}-{iso week}`. The matcher and the reaper find
/// owners by looking for the vm and disk names inside this string.
pub fn snapshot_name<Tz: TimeZone>(
    vm: &VirtualMachine,
    disk: &VirtualDisk,
    at: &DateTime<Tz>,
) -> String {
    let week = at.iso_week();
    format!("{}_{}_KW{}-{:02}", vm.name, disk.name, week.year(), week.week())
}

/// `Auto-Script: {data center}-->{vm}-->{disk}`
pub fn snapshot_description(dc: &DataCenter, vm: &VirtualMachine, disk: &VirtualDisk) -> String {
    format!(
        "{AUTO_SCRIPT_MARKER} {}-->{}-->{}",
        dc.name, vm.name, disk.name
    )
}

pub fn snapshot_request<Tz: TimeZone>(
    dc: &DataCenter,
    vm: &VirtualMachine,
    disk: &VirtualDisk,
    at: &DateTime<Tz>,
) -> SnapshotRequest {
    SnapshotRequest {
        name: snapshot_name(vm, disk, at),
        description: snapshot_description(dc, vm, disk),
    }
}

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status of a snapshot whose creation was just requested.
pub const INITIATED: &str = "initiated";

/// Remote state of a snapshot that finished and can be used.
pub const AVAILABLE: &str = "AVAILABLE";

/// Snapshots the scheduler still waits on: vm id -> snapshot id -> status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingState(BTreeMap<String, BTreeMap<String, String>>);

impl PendingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a freshly requested snapshot.
    pub fn track(&mut self, vm_id: impl Into<String>, snapshot_id: impl Into<String>) {
        self.0
            .entry(vm_id.into())
            .or_default()
            .insert(snapshot_id.into(), INITIATED.to_owned());
    }

    /// Record `status` for a tracked snapshot. Returns whether it changed.
    /// Untracked snapshots are left alone.
    pub fn set_status(&mut self, vm_id: &str, snapshot_id: &str, status: &str) -> bool {
        match self.0.get_mut(vm_id).and_then(|s| s.get_mut(snapshot_id)) {
            Some(current) if current != status => {
                status.clone_into(current);
                true
            }
            _ => false,
        }
    }

    pub fn status(&self, vm_id: &str, snapshot_id: &str) -> Option<&str> {
        self.0.get(vm_id)?.get(snapshot_id).map(String::as_str)
    }

    pub fn snapshots(&self, vm_id: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(vm_id)
    }

    pub fn vm_ids(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Forget everything tracked for `vm_id`.
    pub fn clear_vm(&mut self, vm_id: &str) -> Option<BTreeMap<String, String>> {
        self.0.remove(vm_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of tracked snapshots over all vms.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

impl From<BTreeMap<String, BTreeMap<String, String>>> for PendingState {
    fn from(map: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self(map)
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use cloudapi::{
    CloudApi, DataCenter, Error as ApiError, SnapshotRecord, SnapshotRequest, VirtualDisk,
    VirtualMachine,
};
use orchestrator::Error;
use orchestrator::notify::{Notifier, SuccessMessage};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Local noon of the given day, so date arithmetic never crosses midnight
/// whatever the zone of the test host.
pub fn local_noon(year: i32, month: u32, day: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap()
}

pub fn utc(at: DateTime<Local>) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}

#[derive(Default)]
struct Cloud {
    data_centers: Vec<DataCenter>,
    vms: HashMap<String, Vec<VirtualMachine>>,
    disks: HashMap<String, Vec<VirtualDisk>>,
    snapshots: Vec<SnapshotRecord>,
    created: Vec<(String, String, SnapshotRequest)>,
    deleted: Vec<String>,
    failing_disks: HashSet<String>,
    failing_deletes: HashSet<String>,
    failing_data_centers: HashSet<String>,
    unauthorized: bool,
    next_id: u32,
    now: Option<DateTime<Utc>>,
}

/// In-memory cloud. Clones share the same account.
#[derive(Clone, Default)]
pub struct FakeCloud {
    inner: Arc<Mutex<Cloud>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_data_center(&self, id: &str, name: &str) -> DataCenter {
        let dc = DataCenter {
            id: id.into(),
            name: name.into(),
        };
        self.inner.lock().data_centers.push(dc.clone());
        dc
    }

    pub fn add_vm(&self, dc: &DataCenter, id: &str, name: &str) -> VirtualMachine {
        let vm = VirtualMachine {
            id: id.into(),
            name: name.into(),
        };
        self.inner
            .lock()
            .vms
            .entry(dc.id.clone())
            .or_default()
            .push(vm.clone());
        vm
    }

    pub fn add_disk(&self, vm: &VirtualMachine, id: &str, name: &str) -> VirtualDisk {
        let disk = VirtualDisk {
            id: id.into(),
            name: name.into(),
            owner_vm_id: vm.id.clone(),
        };
        self.inner
            .lock()
            .disks
            .entry(vm.id.clone())
            .or_default()
            .push(disk.clone());
        disk
    }

    pub fn add_snapshot(&self, snapshot: SnapshotRecord) {
        self.inner.lock().snapshots.push(snapshot);
    }

    /// Creation time given to snapshots created through the API.
    pub fn set_now(&self, now: DateTime<Utc>) {
        self.inner.lock().now = Some(now);
    }

    pub fn set_state(&self, snapshot_id: &str, state: &str) {
        let mut inner = self.inner.lock();
        if let Some(snapshot) = inner.snapshots.iter_mut().find(|s| s.id == snapshot_id) {
            snapshot.state = state.into();
        }
    }

    pub fn fail_disk(&self, disk_id: &str) {
        self.inner.lock().failing_disks.insert(disk_id.into());
    }

    pub fn fail_delete(&self, snapshot_id: &str) {
        self.inner.lock().failing_deletes.insert(snapshot_id.into());
    }

    pub fn fail_data_center(&self, dc_id: &str) {
        self.inner.lock().failing_data_centers.insert(dc_id.into());
    }

    pub fn revoke_credentials(&self) {
        self.inner.lock().unauthorized = true;
    }

    pub fn created(&self) -> Vec<(String, String, SnapshotRequest)> {
        self.inner.lock().created.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.inner.lock().deleted.clone()
    }

    pub fn snapshot_ids(&self) -> Vec<String> {
        self.inner.lock().snapshots.iter().map(|s| s.id.clone()).collect()
    }

    fn guard(&self) -> Result<parking_lot::MutexGuard<'_, Cloud>, ApiError> {
        let inner = self.inner.lock();
        if inner.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        Ok(inner)
    }
}

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        body: "service unavailable".into(),
    }
}

#[async_trait]
impl CloudApi for FakeCloud {
    async fn data_centers(&self) -> Result<Vec<DataCenter>, ApiError> {
        Ok(self.guard()?.data_centers.clone())
    }

    async fn virtual_machines(&self, data_center: &DataCenter) -> Result<Vec<VirtualMachine>, ApiError> {
        let inner = self.guard()?;
        if inner.failing_data_centers.contains(&data_center.id) {
            return Err(unavailable());
        }
        Ok(inner.vms.get(&data_center.id).cloned().unwrap_or_default())
    }

    async fn virtual_disks(
        &self,
        _data_center: &DataCenter,
        vm: &VirtualMachine,
    ) -> Result<Vec<VirtualDisk>, ApiError> {
        Ok(self.guard()?.disks.get(&vm.id).cloned().unwrap_or_default())
    }

    async fn snapshots(&self) -> Result<Vec<SnapshotRecord>, ApiError> {
        Ok(self.guard()?.snapshots.clone())
    }

    async fn create_snapshot(
        &self,
        data_center: &DataCenter,
        disk: &VirtualDisk,
        request: &SnapshotRequest,
    ) -> Result<String, ApiError> {
        let mut inner = self.guard()?;
        if inner.failing_disks.contains(&disk.id) {
            return Err(unavailable());
        }
        inner.next_id += 1;
        let id = format!("snap-{}", inner.next_id);
        let created_at = inner.now.unwrap_or_else(Utc::now);
        inner.snapshots.push(SnapshotRecord::new(
            id.clone(),
            request.name.clone(),
            request.description.clone(),
            created_at,
            10,
            "BUSY",
        ));
        inner
            .created
            .push((data_center.id.clone(), disk.id.clone(), request.clone()));
        Ok(id)
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), ApiError> {
        let mut inner = self.guard()?;
        if inner.failing_deletes.contains(snapshot_id) {
            return Err(unavailable());
        }
        inner.snapshots.retain(|s| s.id != snapshot_id);
        inner.deleted.push(snapshot_id.into());
        Ok(())
    }
}

/// Notifier that keeps every message. Clones share the same inbox.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SuccessMessage>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SuccessMessage> {
        self.sent.lock().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &SuccessMessage) -> Result<(), Error> {
        if *self.failing.lock() {
            return Err(Error::Notification("mail server down".into()));
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

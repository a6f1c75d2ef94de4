use chrono::{DateTime, Utc};

/// Description prefix stamped on every snapshot this tool creates. It is the
/// only thing telling those apart from snapshots made by hand.
pub const AUTO_SCRIPT_MARKER: &str = "Auto-Script:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCenter {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualMachine {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDisk {
    pub id: String,
    pub name: String,
    pub owner_vm_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub size_gb: u64,
    /// Remote lifecycle state, e.g. `BUSY` or `AVAILABLE`.
    pub state: String,
    pub auto_script_created: bool,
}

impl SnapshotRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
        size_gb: u64,
        state: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            id: id.into(),
            name: name.into(),
            auto_script_created: description.contains(AUTO_SCRIPT_MARKER),
            description,
            created_at,
            size_gb,
            state: state.into(),
        }
    }
}

/// Name and description sent along with a snapshot creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub name: String,
    pub description: String,
}

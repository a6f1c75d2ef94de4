//! Access to the cloud provider's resource API: data centers, servers,
//! volumes and snapshots.

mod client;
mod error;
mod model;
mod wire;

pub use client::{CloudApi, HttpCloudApi};
pub use error::Error;
pub use model::{
    AUTO_SCRIPT_MARKER, DataCenter, SnapshotRecord, SnapshotRequest, VirtualDisk, VirtualMachine,
};

#![forbid(unsafe_code)]

mod naming;
mod pending;

pub use naming::{snapshot_description, snapshot_name, snapshot_request};
pub use pending::{AVAILABLE, INITIATED, PendingState};

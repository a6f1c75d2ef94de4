#![forbid(unsafe_code)]

use chrono::{DateTime, Local, Utc};
use itertools::Itertools;
use serde::Serialize;

/// A machine whose tracked snapshots all became available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessMessage {
    pub vm_id: String,
    pub vm_name: String,
    /// Creation times of the completed snapshots.
    pub completed_at: Vec<DateTime<Utc>>,
}

impl SuccessMessage {
    pub fn subject(&self) -> String {
        format!("{} snapshot success", self.vm_name)
    }

    /// Creation times as local `YYYY-MM-DD HH:MM`, `; `-separated.
    pub fn completed_list(&self) -> String {
        self.completed_at
            .iter()
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M"))
            .join("; ")
    }

    pub fn body(&self) -> String {
        format!(
            "Snapshots have been made today!\r\nServer: {}\r\nID: {}\r\nLastBackups: {}\r\n",
            self.vm_name,
            self.vm_id,
            self.completed_list()
        )
    }
}

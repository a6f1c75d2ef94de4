#![forbid(unsafe_code)]

use super::{Persisted, Table, title};
use chrono::{DateTime, Local};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckAction {
    /// Some snapshots are not available yet.
    Waiting,
    /// Complete, but nothing changed since the last run.
    NothingToDo,
    /// Completion was announced and the machine's entries were cleared.
    Notified,
    NotifyFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRow {
    pub vm_id: String,
    pub vm_name: String,
    pub statuses: Vec<(String, String)>,
    pub action: CheckAction,
}

#[derive(Debug)]
pub struct CheckReport {
    pub started_at: DateTime<Local>,
    pub rows: Vec<CheckRow>,
    pub persisted: Persisted,
}

impl CheckReport {
    pub fn notified(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.action == CheckAction::Notified)
            .count()
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(["Server", "ID", "Snapshots", "Action"]);
        for row in &self.rows {
            let statuses = row
                .statuses
                .iter()
                .counts_by(|(_, status)| status.as_str())
                .into_iter()
                .sorted()
                .map(|(status, n)| format!("{n}x {status}"))
                .join(", ");
            let action = match &row.action {
                CheckAction::Waiting => "waiting".to_owned(),
                CheckAction::NothingToDo => "nothing to do!".to_owned(),
                CheckAction::Notified => "mail sent!".to_owned(),
                CheckAction::NotifyFailed(reason) => format!("notification failed: {reason}"),
            };
            table.push([row.vm_name.clone(), row.vm_id.clone(), statuses, action]);
        }
        table
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        title(f, "Snapshot checker", self.started_at)?;
        write!(f, "{}", self.table())?;
        writeln!(f)?;
        writeln!(f, "{} notification(s) sent; {}", self.notified(), self.persisted)
    }
}
